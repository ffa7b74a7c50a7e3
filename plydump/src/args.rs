//! Defines `Args` which is used to parse command line arguments.

use structopt::StructOpt;


#[derive(StructOpt, Debug)]
#[structopt(raw(setting = "structopt::clap::AppSettings::VersionlessSubcommands"))]
pub struct Args {
    #[structopt(flatten)]
    pub global: GlobalArgs,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub struct GlobalArgs {
    /// Show log messages of the PLY reader. `-v` shows debug messages, `-vv`
    /// additionally shows trace messages.
    #[structopt(
        short = "-v",
        long = "--verbose",
        parse(from_occurrences),
    )]
    pub verbose: u8,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Print the header information of a PLY file.
    #[structopt(name = "info")]
    Info {
        #[structopt(flatten)]
        args: InfoArgs,
    },

    /// Print the first few values of properties of a PLY file.
    #[structopt(name = "dump")]
    Dump {
        #[structopt(flatten)]
        args: DumpArgs,
    },
}

#[derive(StructOpt, Debug)]
pub struct InfoArgs {
    /// If specified, the body of the file is read completely, too. Everything
    /// printed is stored in the header, but reading the body checks whether
    /// the file is completely valid.
    #[structopt(
        long = "--read-body",
    )]
    pub read_body: bool,

    /// Path to the PLY file.
    pub file: String,
}

#[derive(StructOpt, Debug)]
pub struct DumpArgs {
    /// Number of elements to print per element group.
    #[structopt(
        short = "-n",
        long = "--count",
        default_value = "10",
    )]
    pub count: usize,

    /// Only print this element group. Can be given multiple times. All
    /// element groups are printed by default.
    #[structopt(
        short = "-e",
        long = "--element",
        raw(number_of_values = "1"),
    )]
    pub elements: Vec<String>,

    /// Only print this property. Can be given multiple times. All properties
    /// are printed by default. Element groups without any of the given
    /// properties are skipped.
    #[structopt(
        short = "-p",
        long = "--property",
        raw(number_of_values = "1"),
    )]
    pub properties: Vec<String>,

    /// Path to the PLY file.
    pub file: String,
}
