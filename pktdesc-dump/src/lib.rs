//! Dissect frames given on the command line.
//!
//! The binary parses a hex encoded frame, runs it through a dissector with the tunnel modules
//! registered and prints the spans together with the descriptor bytes. The pieces live here so
//! they can be tested without a process.
pub mod config;

use std::fmt;

use pktdesc::descriptor::{Descriptor, Endian, MAX_DESCRIPTOR_LEN};
use pktdesc::{Dissector, Registry, Span};

use crate::config::Config;

/// A failure to turn the arguments into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A character that is neither a hex digit nor a separator.
    InvalidDigit(char),
    /// The hex digits do not form whole octets.
    OddLength,
    /// The wire length is shorter than the frame.
    WireLength { wire_len: usize, capture_len: usize },
    /// Writing or reading back the descriptor failed.
    Descriptor(pktdesc::Error),
}

/// The result of dissecting one frame.
#[derive(Debug, Clone)]
pub struct Report {
    pub capture_len: usize,
    pub wire_len: usize,
    pub spans: Vec<Span>,
    pub endian: Endian,
    pub descriptor: Vec<u8>,
}

/// Decode hex digits, ignoring whitespace, `:` and `-` between octets and a leading `0x`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, Error> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);

    let mut digits = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ':' | '-' => continue,
            ch if ch.is_whitespace() => continue,
            ch => digits.push(ch.to_digit(16).ok_or(Error::InvalidDigit(ch))? as u8),
        }
    }

    if digits.len() % 2 != 0 {
        return Err(Error::OddLength);
    }

    Ok(digits.chunks_exact(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}

/// Parse the frame of the arguments and dissect it.
pub fn run(config: &Config) -> Result<Report, Error> {
    let mut frame = Vec::new();
    for part in &config.frame {
        frame.extend(parse_hex(part)?);
    }

    let mut registry = Registry::new();
    if !config.no_tunnels {
        pktdesc_tunnel::register(&mut registry).map_err(Error::Descriptor)?;
    }

    let wire_len = config.wire_len.unwrap_or(frame.len());
    if wire_len < frame.len() {
        return Err(Error::WireLength { wire_len, capture_len: frame.len() });
    }

    let mut dissector = Dissector::with_extensions(config.dissect_config(), &registry);
    dissector.reset();
    dissector.dissect(&frame, frame.len(), wire_len, config.timestamp);

    let mut descriptor = vec![0; MAX_DESCRIPTOR_LEN];
    let len = if config.fast {
        dissector.write_descriptor_fast(&mut descriptor, config.endian)
    } else {
        dissector.write_descriptor(&mut descriptor, config.endian)
    }.map_err(Error::Descriptor)?;
    descriptor.truncate(len);

    log::debug!("{} spans in {} octets of descriptor", dissector.record_count(), len);

    Ok(Report {
        capture_len: frame.len(),
        wire_len,
        spans: dissector.spans().collect(),
        endian: config.endian,
        descriptor,
    })
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidDigit(ch) => write!(f, "`{}` is not a hex digit", ch),
            Error::OddLength => write!(f, "frame ends in half an octet"),
            Error::WireLength { wire_len, capture_len } => write!(f,
                "wire length {} is shorter than the {} octet frame", wire_len, capture_len),
            Error::Descriptor(err) => write!(f, "descriptor: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "captured {} of {} octets", self.capture_len, self.wire_len)?;
        for span in &self.spans {
            writeln!(f, "  {:<12} {:>5} .. {:<5} ({})",
                span.id.to_string(), span.offset, span.offset + span.length, span.length)?;
        }

        let descriptor = Descriptor::new_checked(&self.descriptor, self.endian)
            .map_err(|_| fmt::Error)?;
        writeln!(f, "l2 {:?}, bitmask {:#010x}, fragment {}/{}",
            descriptor.l2_type(),
            descriptor.bitmask().bits(),
            descriptor.is_fragment(),
            descriptor.is_last_fragment())?;

        writeln!(f, "descriptor, {} octets {:?} endian:", descriptor.len(), self.endian)?;
        for (line, chunk) in self.descriptor.chunks(16).enumerate() {
            write!(f, "  {:04x} ", line*16)?;
            for byte in chunk {
                write!(f, " {:02x}", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pktdesc::descriptor::HEADER_LEN;
    use pktdesc::ProtocolId;
    use structopt::StructOpt;

    const ARP_REQUEST: &str = "ff:ff:ff:ff:ff:ff 00:07:0d:af:f4:54 0806 \
        0001 0800 06 04 0001 00070dafF454 18a6ac01 000000000000 18a6ad9f";

    fn config(args: &[&str]) -> Config {
        let args = std::iter::once("pktdesc-dump").chain(args.iter().cloned());
        Config::from_iter_safe(args).unwrap()
    }

    #[test]
    fn hex_separators() {
        assert_eq!(parse_hex("0x0a0B"), Ok(vec![0x0a, 0x0b]));
        assert_eq!(parse_hex(" de:ad-be ef\n"), Ok(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(parse_hex(""), Ok(vec![]));
        assert_eq!(parse_hex("abc"), Err(Error::OddLength));
        assert_eq!(parse_hex("0g"), Err(Error::InvalidDigit('g')));
    }

    #[test]
    fn arp_report() {
        let report = run(&config(&["--endian", "big", ARP_REQUEST])).unwrap();
        assert_eq!(report.capture_len, 42);
        assert_eq!(report.spans, vec![
            Span::new(ProtocolId::ETHERNET, 0, 14),
            Span::new(ProtocolId::ARP, 14, 28),
        ]);
        assert_eq!(report.descriptor.len(), HEADER_LEN + 8);

        let text = report.to_string();
        assert!(text.starts_with("captured 42 of 42 octets\n"));
        assert!(text.contains("descriptor, 32 octets Big endian:"));
    }

    #[test]
    fn fast_and_layout_agree() {
        let layout = run(&config(&["--wire-len", "60", ARP_REQUEST])).unwrap();
        let fast = run(&config(&["--fast", "--wire-len", "60", ARP_REQUEST])).unwrap();
        assert_eq!(layout.wire_len, 60);
        assert_eq!(layout.descriptor, fast.descriptor);
    }

    #[test]
    fn wire_shorter_than_frame() {
        let err = run(&config(&["--wire-len", "10", ARP_REQUEST])).unwrap_err();
        assert_eq!(err, Error::WireLength { wire_len: 10, capture_len: 42 });
    }
}
