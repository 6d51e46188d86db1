extern crate anyhow;
extern crate chrono;
extern crate flexi_logger;
extern crate getopts;
extern crate image;
extern crate imageproc;
extern crate reqwest;
extern crate rusttype;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod alerts;
mod clock;
mod config;
mod debug;
mod driver;
mod fetch;
mod keys;
mod panel;
mod poller;
mod render;
mod result;
mod store;
mod transit;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    opts.optopt("c", "config", "Path to the JSON config file.", "FILE");
    opts.optopt("i", "save-image", "Where to write each rendered frame as a png.", "FILENAME");
    opts.optflag("o", "one-shot", "Fetch once, render one frame, and exit.");
    opts.optopt("p", "debug-port", "Run the debug HTTP server on this port.", "PORT");

    let matches = opts.parse(&args[1..]).expect("parse opts");

    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .expect("logger setup")
        .log_to_file(flexi_logger::FileSpec::default().directory("."))
        .duplicate_to_stderr(flexi_logger::Duplicate::Info)
        .start()
        .expect("logger start");

    let config_path = matches.opt_str("config")
        .unwrap_or("railsign.json".to_string());
    let config = match config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load config from {}: {}", config_path, err);
            std::process::exit(1);
        },
    };

    let png_out = matches.opt_str("save-image");
    let one_shot = matches.opt_present("one-shot");
    info!("Running. config={} one-shot={}", config_path, one_shot);

    if let Some(port_str) = matches.opt_str("debug-port") {
        let port: u16 = port_str.parse().expect("debug port");
        let debug_png = png_out.clone();
        std::thread::spawn(move || debug::run_debug_server(port, debug_png));
    }

    let mut panel = match panel::ImagePanel::new(&config.font_path, png_out) {
        Ok(panel) => panel,
        Err(err) => {
            error!("Could not set up the display panel: {}", err);
            std::process::exit(1);
        },
    };

    if let Err(err) = driver::run(config, &mut panel, one_shot) {
        error!("{}", err);
        std::process::exit(1);
    }
}
