#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_property as property;
pub use vc_utils as utils;

pub use vc_property::derive::{Bean, PropertyEnum};
pub use vc_property::{Bean, BeanRef, PropertyAccessor, Shared, Value};
