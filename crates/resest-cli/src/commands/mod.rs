pub(crate) mod estimate;
pub(crate) mod helpers;
pub(crate) mod sweep;
pub(crate) mod table;
