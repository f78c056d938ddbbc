pub(crate) mod compositor;
pub(crate) mod cover;
pub(crate) mod leaf;
pub(crate) mod plan;
