//! Command-line access to the linear feature generator: read segments and materials from JSON,
//! write textured ribbons as GeoJSON.

#[macro_use]
extern crate log;

mod generate;

use anyhow::Result;
use structopt::StructOpt;

use linear_features::Options;

#[derive(StructOpt)]
#[structopt(name = "lfcli", about = "Generate ribbons for taxiway lines and other linear features")]
enum Command {
    /// Build intersections and texture parameters for a set of segments
    Generate {
        /// The path to a JSON file with segments and materials
        #[structopt(long)]
        input: String,
        /// The GeoJSON file to write
        #[structopt(long)]
        output: String,
        /// A JSON file overriding some of the default options
        #[structopt(long)]
        options: Option<String>,
        /// Drop duplicate segments and split segments at T-junctions first
        #[structopt(long)]
        clean: bool,
    },
    /// Print the default options as JSON
    DefaultOptions,
}

fn main() -> Result<()> {
    let cmd = Command::from_args();
    if !matches!(cmd, Command::DefaultOptions) {
        abstutil::logger::setup();
    }

    match cmd {
        Command::Generate {
            input,
            output,
            options,
            clean,
        } => {
            let opts = match options {
                Some(path) => Options::load(&path)?,
                None => Options::default(),
            };
            generate::run(input, output, opts, clean)?;
        }
        Command::DefaultOptions => {
            println!("{}", abstutil::to_json(&Options::default())?);
        }
    }
    Ok(())
}
