pub(crate) mod artifact;
pub(crate) mod naming;
pub(crate) mod png;
