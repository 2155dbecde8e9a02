/* src/cli/core/src/config/tests/mod.rs */


use super::*;
