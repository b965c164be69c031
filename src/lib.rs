pub mod export;

pub use frog_reader::{
	decode, encode, model, sound, ContainerOptions, DataReader, DataWriter, EncodeSource, Error, FixedString,
	Readable, Result, Writable,
};
