//! Prototype sound bank: whole `.wav` files stored back to back, sized by the companion header.

use std::cell::OnceCell;
use log::debug;
use crate::{error::Error, write_slice, DataReader, DataWriter, Readable, Result, Writable};

const RIFF: &str = "RIFF";
const WAVE: &str = "WAVE";
const FMT: &[u8] = b"fmt ";

/// The `fmt ` block of a wav file.
#[derive(Readable, Writable, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
	/// 1 for PCM
	pub audio_format: u16,
	pub channels: u16,
	pub sample_rate: u32,
	pub byte_rate: u32,
	pub block_align: u16,
	pub bits_per_sample: u16,
}

impl WavFormat {
	pub fn parse(wav: &[u8]) -> Result<Self> {
		let mut reader = DataReader::new(wav);
		reader.verify_string(RIFF).map_err(|_| Error::InvalidWav("missing RIFF signature"))?;
		reader.skip(4)?;//riff size
		reader.verify_string(WAVE).map_err(|_| Error::InvalidWav("not a WAVE file"))?;
		reader.find_bytes(FMT, true).map_err(|_| Error::InvalidWav("no fmt block"))?;
		reader.skip(4)?;//block size
		reader.read()
	}
}

#[derive(Debug, Clone, Default)]
pub struct PrototypeSound {
	wav: Box<[u8]>,
	format: OnceCell<WavFormat>,
}

impl PrototypeSound {
	pub fn new(wav: impl Into<Box<[u8]>>) -> Self {
		Self {
			wav: wav.into(),
			format: OnceCell::new(),
		}
	}

	/// Reads `len` bytes, or nothing once the bank is exhausted.
	pub fn read(reader: &mut DataReader, len: usize) -> Result<Self> {
		if !reader.has_more() {
			debug!("no data for sound at {:#x}", reader.position());
			return Ok(Self::default());
		}
		Ok(Self::new(reader.read_bytes(len)?))
	}

	pub fn wav(&self) -> &[u8] {
		&self.wav
	}

	pub fn is_empty(&self) -> bool {
		self.wav.is_empty()
	}

	/// Parsed once, then cached until the sound is replaced.
	pub fn format(&self) -> Result<WavFormat> {
		if let Some(format) = self.format.get() {
			return Ok(*format);
		}
		let format = WavFormat::parse(&self.wav)?;
		Ok(*self.format.get_or_init(|| format))
	}

	/// Swaps in a new wav file. Nothing changes if it does not parse.
	pub fn replace_with_wav(&mut self, wav: impl Into<Box<[u8]>>) -> Result<()> {
		let wav = wav.into();
		WavFormat::parse(&wav)?;
		self.wav = wav;
		self.format.take();
		Ok(())
	}
}

impl Writable for PrototypeSound {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		writer.write_bytes(&self.wav);
		Ok(())
	}
}

#[derive(Debug, Clone, Default)]
pub struct SoundBank {
	pub sounds: Vec<PrototypeSound>,
}

impl SoundBank {
	/// One sound per entry of `lengths`, which come from the bank's header file.
	pub fn read(reader: &mut DataReader, lengths: &[usize]) -> Result<Self> {
		let sounds = lengths
			.iter()
			.map(|&len| PrototypeSound::read(reader, len))
			.collect::<Result<_>>()?;
		Ok(Self { sounds })
	}

	pub fn lengths(&self) -> Vec<usize> {
		self.sounds.iter().map(|sound| sound.wav.len()).collect()
	}
}

impl Writable for SoundBank {
	fn write(&self, writer: &mut DataWriter) -> Result<()> {
		write_slice(writer, &self.sounds)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::encode;

	fn wav(sample_rate: u32, samples: &[u8]) -> Vec<u8> {
		let format = WavFormat {
			audio_format: 1,
			channels: 1,
			sample_rate,
			byte_rate: sample_rate,
			block_align: 1,
			bits_per_sample: 8,
		};
		let mut w = DataWriter::new();
		w.write_bytes(b"RIFF");
		w.write(&(4 + 8 + 16 + 8 + samples.len() as u32)).unwrap();
		w.write_bytes(b"WAVE");
		w.write_bytes(b"fmt ");
		w.write(&16u32).unwrap();
		w.write(&format).unwrap();
		w.write_bytes(b"data");
		w.write(&(samples.len() as u32)).unwrap();
		w.write_bytes(samples);
		w.into_bytes()
	}

	#[test]
	fn bank_round_trip_with_missing_last_entry() {
		let first = wav(11025, &[1, 2, 3]);
		let second = wav(22050, &[4]);
		let mut bytes = first.clone();
		bytes.extend(&second);
		let mut reader = DataReader::new(bytes.clone());
		let bank = SoundBank::read(&mut reader, &[first.len(), second.len(), 500]).unwrap();
		assert_eq!(bank.sounds.len(), 3);
		assert!(bank.sounds[2].is_empty());
		assert_eq!(bank.lengths(), [first.len(), second.len(), 0]);
		assert_eq!(bank.sounds[1].format().unwrap().sample_rate, 22050);
		assert_eq!(encode(&bank).unwrap(), bytes);
	}

	#[test]
	fn short_sound_data_fails() {
		let mut reader = DataReader::new(wav(8000, &[]));
		assert!(matches!(SoundBank::read(&mut reader, &[1000]), Err(Error::EndOfData { .. })));
	}

	#[test]
	fn format_is_cached_until_replaced() {
		let mut sound = PrototypeSound::new(wav(11025, &[0; 4]));
		let format = sound.format().unwrap();
		assert_eq!(format.channels, 1);
		assert_eq!(format.bits_per_sample, 8);
		assert_eq!(sound.format.get(), Some(&format));

		sound.replace_with_wav(wav(44100, &[0; 2])).unwrap();
		assert_eq!(sound.format.get(), None);
		assert_eq!(sound.format().unwrap().sample_rate, 44100);
	}

	#[test]
	fn replacement_needs_riff_header() {
		let original = wav(11025, &[9]);
		let mut sound = PrototypeSound::new(original.clone());
		let mut bad = wav(22050, &[9]);
		bad[..4].copy_from_slice(b"RIFX");
		assert!(matches!(sound.replace_with_wav(bad), Err(Error::InvalidWav(_))));
		assert!(matches!(sound.replace_with_wav(b"RIFF\0\0\0\0AVI ".to_vec()), Err(Error::InvalidWav(_))));
		assert!(matches!(sound.replace_with_wav(b"RIFF\0\0\0\0WAVEdata".to_vec()), Err(Error::InvalidWav(_))));
		assert_eq!(sound.wav(), original.as_slice());
		assert!(PrototypeSound::default().format().is_err());
	}
}
