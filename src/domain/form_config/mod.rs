//! Form configuration domain.
//!
//! The checkout form's steps live in a spreadsheet tab so they can be edited
//! without a deploy.

mod form_step;

pub use form_step::{
    parse_form_steps, parse_options, FormOption, FormStep, DEFAULT_SECTION, FIELD_TYPE_SELECT,
    FIELD_TYPE_WELCOME,
};
