//! Print the spans and the descriptor of a frame.
//!
//! The frame is given as hex digits, octets may be separated by whitespace, `:` or `-`. Call
//! example, a raw IPv4 header with an empty UDP datagram:
//!
//! * `pktdesc-dump --raw-ip 4500001c00010000401100000a0000010a000002 0001000200080000`
//!
//! Log records of the dissector are enabled with `-v` (debug) and `-vv` (trace).
use std::process;

use pktdesc_dump::config::Config;

fn main() {
    let config = Config::from_args();

    env_logger::Builder::new()
        .filter_level(match config.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .format_timestamp(None)
        .init();

    match pktdesc_dump::run(&config) {
        Ok(report) => print!("{}", report),
        Err(err) => {
            eprintln!("[-] {}", err);
            process::exit(1);
        },
    }
}
