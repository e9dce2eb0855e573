//! Shared test harness modules for the Sitescore CLI.

use super::*;

mod helpers;
