use clap::Arg;

pub mod edit;
pub mod generate;
pub mod init;
pub mod serve;

pub fn output_dir_arg() -> Arg {
    Arg::new("output-dir")
        .short('o')
        .long("output-dir")
        .alias("outputDir")
        .value_name("DIR")
        .env("PRESSMARK_OUTPUT_DIR")
        .help("Directory where HTML files are generated")
}
