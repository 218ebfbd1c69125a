use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use vmem::{AddressSpace, Endianness, HumanAddress, HumanSize};

mod console;

#[derive(Parser)]
#[command(name = "vmem-inspect")]
#[command(about = "Load raw memory images into a sparse address space and inspect them")]
struct Args {
    /// Byte order used by scalar reads ("little" or "big")
    #[arg(long, default_value = "little", value_parser = Endianness::from_str)]
    endian: Endianness,

    /// Raw image to load, as PATH@ADDRESS (e.g. firmware.bin@0x10000000); repeatable
    #[arg(short, long = "map", value_name = "PATH@ADDRESS")]
    maps: Vec<MapSpec>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every mapping and the total mapped size
    Summary,
    /// Hex dump a range of memory
    Read {
        /// Start address (hexadecimal with 0x prefix, or decimal)
        #[arg(short, long, value_parser = parse_address)]
        address: usize,

        /// Number of bytes to dump; dumps to the end of the mapping when omitted
        #[arg(short, long, value_parser = parse_address)]
        length: Option<usize>,
    },
    /// Print the zero-terminated string at an address
    Cstr {
        /// Address of the first character
        #[arg(short, long, value_parser = parse_address)]
        address: usize,
    },
    /// Print the unsigned integer at an address
    Scalar {
        /// Address of the first byte
        #[arg(short, long, value_parser = parse_address)]
        address: usize,

        /// Width of the integer in bits
        #[arg(short, long, value_enum, default_value = "32")]
        width: Width,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Width {
    #[value(name = "8")]
    W8,
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

/// A raw image file and the address it is loaded at.
#[derive(Clone, Debug, PartialEq, Eq)]
struct MapSpec {
    path: PathBuf,
    address: usize,
}

impl FromStr for MapSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, address) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("expected PATH@ADDRESS, got {:?}", s))?;
        if path.is_empty() {
            return Err(format!("missing path in {:?}", s));
        }
        Ok(Self {
            path: PathBuf::from(path),
            address: parse_address(address)?,
        })
    }
}

/// Parses an address or length given either as `0x`-prefixed hexadecimal or decimal.
fn parse_address(s: &str) -> Result<usize, String> {
    let s = s.trim().replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16)
    } else {
        s.parse::<usize>()
    };
    parsed.map_err(|e| format!("invalid address {:?}: {}", s, e))
}

fn load(space: &mut AddressSpace, spec: &MapSpec) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(&spec.path)?;
    let end = spec
        .address
        .checked_add(data.len())
        .ok_or_else(|| {
            format!(
                "{} does not fit at {}",
                spec.path.display(),
                HumanAddress(spec.address)
            )
        })?;

    let covering = space.add_mapping(spec.address, end)?;
    space.write(spec.address..end, &data)?;

    log::info!(
        "loaded {} ({}) at {}, mapping now {}-{}",
        spec.path.display(),
        HumanSize(data.len()),
        HumanAddress(spec.address),
        HumanAddress(covering.start),
        HumanAddress(covering.end)
    );
    Ok(())
}

fn summary(space: &AddressSpace) {
    if !space.is_empty() {
        println!("{}", space);
    }
    println!(
        "{} mapping(s), {} mapped",
        space.mapping_count(),
        HumanSize(space.mapped_size())
    );
}

fn hex_dump(base: usize, bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!(
                "{:>20}  {:<47}  |{}|",
                HumanAddress(base + row * 16).to_string(),
                hex.join(" "),
                ascii
            )
        })
        .collect()
}

fn read(
    space: &AddressSpace,
    address: usize,
    length: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = match length {
        Some(length) => {
            let end = address
                .checked_add(length)
                .ok_or("read range overflows the address space")?;
            space.read(address..end)?
        }
        None => space.read(address..)?,
    };

    for line in hex_dump(address, &bytes) {
        println!("{}", line);
    }
    Ok(())
}

fn scalar(
    space: &AddressSpace,
    address: usize,
    width: Width,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = match width {
        Width::W8 => u64::from(space.read_u8(address)?),
        Width::W16 => u64::from(space.read_u16(address)?),
        Width::W32 => u64::from(space.read_u32(address)?),
        Width::W64 => space.read_u64(address)?,
    };
    println!("{}: {:#x}", HumanAddress(address), value);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    console::Console::init(args.verbose);

    let mut space = AddressSpace::new(args.endian);
    for spec in &args.maps {
        load(&mut space, spec)?;
    }
    log::debug!("address space uses {} endian scalars", space.endianness());

    match args.command {
        Command::Summary => summary(&space),
        Command::Read { address, length } => read(&space, address, length)?,
        Command::Cstr { address } => {
            let bytes = space.read_cstr(address)?;
            println!("{}: {:?}", HumanAddress(address), String::from_utf8_lossy(&bytes));
        }
        Command::Scalar { address, width } => scalar(&space, address, width)?,
    }

    Ok(())
}
