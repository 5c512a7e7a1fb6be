pub mod error;
pub mod i18n;
pub mod pagination;
pub mod sanitize;
pub mod validation;
