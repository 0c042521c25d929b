pub(crate) use crate::config::Config;
pub(crate) use crate::error::{bail, SamplerError, SamplerResult};
pub(crate) use crate::progress::ProgressBarBuilder;
pub(crate) use crate::record::Record;
