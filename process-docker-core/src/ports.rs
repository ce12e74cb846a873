use anyhow::Result;

/// Port for invoking the docker CLI.
///
/// `subcommand` is the docker verb (`run`, `inspect`, ...) and `args` follow
/// it. Implementations return captured stdout on success and an error
/// carrying stderr otherwise.
pub trait CommandExec {
    fn exec(&self, subcommand: &str, args: &[String]) -> Result<String>;
}

impl<T: CommandExec + ?Sized> CommandExec for &T {
    fn exec(&self, subcommand: &str, args: &[String]) -> Result<String> {
        (**self).exec(subcommand, args)
    }
}
