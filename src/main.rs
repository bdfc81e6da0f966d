//! FlashRAM save tool.
//!
//! Opens a `.fla` save and drives the chip through the same register and PI DMA sequences a game
//! uses, so the file is read and written exactly as the emulated cartridge would.
//! Usage: flashram <save.fla> <info|format|dump PAGE|erase PAGE|program PAGE HEX>

use std::env;

use ansi_term::Colour::{Cyan, Green, Yellow};
use anyhow::{Context, Result, bail, ensure};
use tracing_subscriber::EnvFilter;

use flashram::bus::{Bus, FLASHRAM_COMMAND, FLASHRAM_STATUS, PiBus};
use flashram::cartridge::flashram::command::{Command, PAGE_SIZE};
use flashram::cartridge::flashram::flashram::{FLASHRAM_SIZE, FlashRam};
use flashram::cartridge::storage::file::FileStorage;
use flashram::cartridge::storage::storage::Storage;

const USAGE: &str = "usage: flashram <save.fla> <info|format|dump PAGE|erase PAGE|program PAGE HEX>";

/// RDRAM scratch buffer for DMA.
const SCRATCH: u32 = 0x1000;

const PAGES: usize = FLASHRAM_SIZE / PAGE_SIZE;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [path, action, rest @ ..] = args.as_slice() else {
        bail!(USAGE);
    };

    let mut storage = if action == "format" {
        FileStorage::create(path)
    } else {
        FileStorage::open(path).with_context(|| format!("opening {path}"))?
    };
    let mut bus = PiBus::new(FlashRam::new(&mut storage));

    match (action.as_str(), rest) {
        ("info", []) => info(&mut bus),
        ("format", []) => {
            bus.flashram.storage_mut().save();
            println!("{} formatted {path}", Green.bold().paint("OK"));
            Ok(())
        }
        ("dump", [page]) => dump(&mut bus, parse_page(page)?),
        ("erase", [page]) => {
            let page = parse_page(page)?;
            erase(&mut bus, page);
            println!("{} erased page {page}", Green.bold().paint("OK"));
            Ok(())
        }
        ("program", [page, hex]) => {
            let page = parse_page(page)?;
            program(&mut bus, page, &parse_hex(hex)?)?;
            println!("{} programmed page {page}", Green.bold().paint("OK"));
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn send(bus: &mut PiBus<FileStorage>, command: Command) {
    bus.write_word(FLASHRAM_COMMAND, command.word(), 0xFFFF_FFFF);
}

/// Read mode addresses the array in 16-bit units.
fn page_cart_addr(page: u16) -> u32 {
    FLASHRAM_STATUS + (page as u32 * PAGE_SIZE as u32) / 2
}

fn info(bus: &mut PiBus<FileStorage>) -> Result<()> {
    send(bus, Command::StatusMode);
    bus.dma_to_rdram(SCRATCH, FLASHRAM_STATUS, 7);
    let status = bus.read_rdram(SCRATCH, 8)?;
    let id = bus.read_word(FLASHRAM_STATUS).unwrap_or(0);

    let erased = bus
        .flashram
        .storage()
        .bytes()
        .chunks(PAGE_SIZE)
        .filter(|page| page.iter().all(|&b| b == 0xFF))
        .count();

    println!("{} {}", Cyan.bold().paint("file"), bus.flashram.storage().path().display());
    println!("{} {id:08X}", Cyan.bold().paint("id"));
    println!("{} {:02X?}", Cyan.bold().paint("status"), status);
    println!("{} {erased}/{PAGES} erased", Cyan.bold().paint("pages"));
    Ok(())
}

fn dump(bus: &mut PiBus<FileStorage>, page: u16) -> Result<()> {
    send(bus, Command::ReadMode);
    bus.dma_to_rdram(SCRATCH, page_cart_addr(page), PAGE_SIZE as u32 - 1);
    let bytes = bus.read_rdram(SCRATCH, PAGE_SIZE)?;

    let base = page as usize * PAGE_SIZE;
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02X}")).collect();
        println!(
            "{}  {}",
            Yellow.paint(format!("{:05X}", base + row * 16)),
            hex.join(" ")
        );
    }
    Ok(())
}

fn erase(bus: &mut PiBus<FileStorage>, page: u16) {
    send(bus, Command::EraseSetup { page });
    send(bus, Command::EraseMode);
    send(bus, Command::Execute);
}

/// Erase, then program `data` padded to a full page with the erased value.
fn program(bus: &mut PiBus<FileStorage>, page: u16, data: &[u8]) -> Result<()> {
    let mut buffer = [0xFF; PAGE_SIZE];
    buffer[..data.len()].copy_from_slice(data);
    bus.write_rdram(SCRATCH, &buffer)?;

    erase(bus, page);
    send(bus, Command::EraseSetup { page });
    send(bus, Command::WriteMode);
    bus.dma_from_rdram(SCRATCH, FLASHRAM_STATUS, PAGE_SIZE as u32 - 1);
    send(bus, Command::Execute);
    Ok(())
}

fn parse_page(arg: &str) -> Result<u16> {
    let page = match arg.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => arg.parse(),
    }
    .with_context(|| format!("invalid page {arg:?}"))?;
    ensure!(page < PAGES, "page {page} out of range (0..{PAGES})");
    Ok(page as u16)
}

fn parse_hex(arg: &str) -> Result<Vec<u8>> {
    ensure!(
        arg.is_ascii() && arg.len() % 2 == 0,
        "hex data must be an even number of hex digits"
    );
    let bytes = (0..arg.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&arg[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .with_context(|| format!("invalid hex data {arg:?}"))?;
    ensure!(bytes.len() <= PAGE_SIZE, "at most {PAGE_SIZE} bytes fit in a page");
    Ok(bytes)
}
