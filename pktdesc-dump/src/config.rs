use structopt::StructOpt;

use pktdesc::descriptor::Endian;
use pktdesc::id::Class;
use pktdesc::{Config as DissectConfig, LinkType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionClass {
    Ipv4,
    Ipv6,
    Tcp,
}

#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "pktdesc-dump", about = "Dissect a frame and print its descriptor")]
pub struct Config {
    /// The frame as hex digits, may be split over several arguments.
    #[structopt(required = true)]
    pub frame: Vec<String>,

    /// The frame starts with an IP header instead of an Ethernet header.
    #[structopt(long = "raw-ip")]
    pub raw_ip: bool,

    /// Length of the frame on the wire, defaults to the captured length.
    #[structopt(long = "wire-len")]
    pub wire_len: Option<usize>,

    #[structopt(long = "timestamp", default_value = "0")]
    pub timestamp: u64,

    /// Byte order of the descriptor words: big, little or native.
    #[structopt(long = "endian", default_value = "native", parse(try_from_str = parse_endian))]
    pub endian: Endian,

    /// Write the descriptor by packing whole words instead of setting each field.
    #[structopt(long = "fast")]
    pub fast: bool,

    /// Report every protocol as present.
    #[structopt(long = "no-bitmask")]
    pub no_bitmask: bool,

    /// Record no option or extension header spans at all.
    #[structopt(long = "no-options")]
    pub no_options: bool,

    /// Record no options of a class: ipv4, ipv6 or tcp.
    #[structopt(long = "disable", number_of_values = 1, parse(try_from_str = parse_class))]
    pub disable: Vec<OptionClass>,

    /// Do not dissect VXLAN, Geneve and ESP.
    #[structopt(long = "no-tunnels")]
    pub no_tunnels: bool,

    /// Levels of encapsulation to enter.
    #[structopt(long = "max-depth", default_value = "4")]
    pub max_depth: u8,

    /// Log the dissection, repeat for more detail.
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
}

impl Config {
    pub fn from_args() -> Self {
        StructOpt::from_args()
    }

    /// The dissector configuration selected by the flags.
    pub fn dissect_config(&self) -> DissectConfig {
        let link = if self.raw_ip {
            LinkType::RawIp
        } else {
            LinkType::Ethernet
        };

        let mut config = DissectConfig::new(link);
        config.max_depth = self.max_depth;
        if self.no_bitmask {
            config.disable_bitmask_recording();
        }
        if self.no_options {
            config.disable_extension_recording_for_all();
        }
        for class in &self.disable {
            config.disable_extension(class.id_class(), &[]);
        }
        config
    }
}

impl OptionClass {
    fn id_class(self) -> Class {
        match self {
            OptionClass::Ipv4 => Class::Ipv4Option,
            OptionClass::Ipv6 => Class::Ipv6Extension,
            OptionClass::Tcp => Class::TcpOption,
        }
    }
}

fn parse_endian(name: &str) -> Result<Endian, String> {
    match name {
        "big" => Ok(Endian::Big),
        "little" => Ok(Endian::Little),
        "native" => Ok(Endian::native()),
        other => Err(format!("unknown byte order `{}`", other)),
    }
}

fn parse_class(name: &str) -> Result<OptionClass, String> {
    match name {
        "ipv4" => Ok(OptionClass::Ipv4),
        "ipv6" => Ok(OptionClass::Ipv6),
        "tcp" => Ok(OptionClass::Tcp),
        other => Err(format!("unknown option class `{}`", other)),
    }
}
