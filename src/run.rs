mod cli;
mod export;

pub(crate) use cli::as_cli;
