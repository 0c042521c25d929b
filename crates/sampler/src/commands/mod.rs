pub(crate) use completions::Completions;
pub(crate) use generate::Generate;
pub(crate) use init::Init;
pub(crate) use verify::Verify;

mod completions;
mod generate;
mod init;
mod verify;
