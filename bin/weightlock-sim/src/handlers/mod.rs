pub(crate) mod dump_params;
pub(crate) mod replay;
