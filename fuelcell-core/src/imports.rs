#![allow(unused_imports)]

pub(crate) use crate::params::*;
pub(crate) use crate::traits::*;
pub(crate) use crate::utils;
pub(crate) use crate::utils::interp::Interp1D;
pub(crate) use crate::utils::{almost_eq, almost_le, is_sorted};
pub(crate) use fuelcell_proc_macros::{HistoryMethods, HistoryVec, SerdeAPI};

pub(crate) use anyhow::{anyhow, bail, ensure, Context};
pub(crate) use itertools::Itertools;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::ffi::OsStr;
pub(crate) use std::fs::File;
pub(crate) use std::path::{Path, PathBuf};
pub(crate) use validator::Validate;
