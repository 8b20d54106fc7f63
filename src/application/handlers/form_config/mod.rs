//! Form configuration handlers.
//!
//! ## Queries
//! - Get the ordered checkout form steps

mod get_form_config;

pub use get_form_config::{
    FormConfigError, FormConfigSource, GetFormConfigHandler, GetFormConfigQuery,
    GetFormConfigResult, DEFAULT_FORM_CONFIG_RANGE,
};
