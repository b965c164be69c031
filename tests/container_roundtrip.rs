use frog_tool::{
	decode, encode,
	model::{
		chunk::{ChunkData, ChunkType, ChunkedFile},
		vtx::{VertexLayout, FULL_MODE},
	},
	ContainerOptions, DataReader, DataWriter, EncodeSource,
};
use glam::{Vec2, Vec3};

fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn u32_le(bytes: &mut Vec<u8>, value: u32) {
	bytes.extend(value.to_le_bytes());
}

fn f32_le(bytes: &mut Vec<u8>, value: f32) {
	bytes.extend(value.to_le_bytes());
}

fn fixed(bytes: &mut Vec<u8>, text: &str, len: usize, pad: u8) {
	bytes.extend(text.as_bytes());
	bytes.push(0);
	bytes.resize(bytes.len() + len - text.len() - 1, pad);
}

fn mesh_body() -> Vec<u8> {
	let mut body = vec![];
	for word in [342, FULL_MODE as u32, 1, 0, 2, 0, 2, 0, 0, 0, 0, 0xFFFF_FFFF, 0] {
		u32_le(&mut body, word);
	}
	fixed(&mut body, "frog_skin", 32, 0);
	fixed(&mut body, "FROG.BMP", 32, 0);
	body.extend((0..80).map(|i| i as u8));
	for word in [0, 1, 2] {
		u32_le(&mut body, word);
	}
	body.extend([0x10, 0x20]);//opaque
	body.extend([0x55, 0x66]);//alignment
	for i in 0..2 {
		let i = i as f32;
		for value in [i, 1.5, -2.0] {
			f32_le(&mut body, value);
		}
		f32_le(&mut body, 1.0);
		for value in [0.0, 0.0, 1.0] {
			f32_le(&mut body, value);
		}
		for _ in 0..5 {
			f32_le(&mut body, 1.0);
		}
		f32_le(&mut body, 0.25);
		f32_le(&mut body, i);
		for word in [0, 0, 3] {
			u32_le(&mut body, word);
		}
	}
	body
}

fn chunk(bytes: &mut Vec<u8>, tag: &[u8; 4], root: bool, name: &str, body: &[u8]) {
	bytes.extend(tag);
	u32_le(bytes, root as u32);
	u32_le(bytes, body.len() as u32);
	fixed(bytes, name, 32, 0);
	bytes.extend(body);
}

fn container() -> Vec<u8> {
	let mut bytes = b"CHNK".to_vec();
	u32_le(&mut bytes, 2);
	chunk(&mut bytes, b"VTX\0", true, "frog", &mesh_body());
	let mut reference = vec![];
	fixed(&mut reference, "frog", 32, 0);
	fixed(&mut reference, "\\GAME\\MODELS\\FROG.VTX", 260, 0xCD);
	chunk(&mut bytes, b"VTX\0", false, "frog", &reference);
	bytes
}

#[test]
fn mesh_and_reference_round_trip() {
	init_logging();
	let bytes = container();
	let file = decode::<ChunkedFile>(&bytes).unwrap();
	assert_eq!(file.chunks.len(), 2);
	assert!(file.trailing.is_empty());

	let (chunk, model) = file.models().next().unwrap();
	assert_eq!(chunk.name, "frog");
	assert!(chunk.unparsed.is_empty());
	assert_eq!(model.layout(), VertexLayout::Full);
	assert_eq!(model.header.flags, 342);
	assert_eq!(model.header.mode6_extra, -1);
	assert_eq!(model.materials.len(), 1);
	assert_eq!(model.materials[0].texture_file, "FROG.BMP");
	assert_eq!(model.materials[0].extra[79], 79);
	assert_eq!(model.small_words, [0, 1, 2]);
	assert_eq!(&*model.opaque, &[0x10, 0x20]);
	assert_eq!(model.vertices.len(), 2);
	assert_eq!(model.vertices[1].position, Vec3::new(1.0, 1.5, -2.0));
	assert_eq!(model.vertices[1].normal, Vec3::Z);
	assert_eq!(model.vertices[1].uv, Vec2::new(0.25, 1.0));

	let reference = &file.chunks[1];
	assert_eq!(reference.chunk_type, ChunkType::Model);
	match &reference.data {
		ChunkData::Reference(reference) => {
			assert_eq!(reference.full_name, "\\GAME\\MODELS\\FROG.VTX");
			assert_eq!(reference.resolved, Some(0));
		},
		other => panic!("expected a reference, got {:?}", other),
	}
	assert!(std::ptr::eq(file.resolve(1).unwrap(), &file.chunks[0]));

	assert!(file.chunks.iter().all(|chunk| chunk.matches_capture().unwrap()));
	assert_eq!(encode(&file).unwrap(), bytes);
}

#[test]
fn captured_and_structured_encodings_agree() {
	init_logging();
	let bytes = container();
	let options = ContainerOptions { encode_source: EncodeSource::Captured, ..ContainerOptions::default() };
	let file = ChunkedFile::read_with(&mut DataReader::new(bytes.clone()), &options).unwrap();
	let mut writer = DataWriter::new();
	file.write_with(&mut writer, &options).unwrap();
	assert_eq!(writer.into_bytes(), bytes);
}

#[test]
fn edited_mesh_reencodes_with_new_counts() {
	init_logging();
	let mut file = decode::<ChunkedFile>(&container()).unwrap();
	if let ChunkData::Model(model) = &mut file.chunks[0].data {
		model.vertices.truncate(1);
		model.opaque = Box::new([1, 2, 3, 4]);
	}
	let bytes = encode(&file).unwrap();
	let reread = decode::<ChunkedFile>(&bytes).unwrap();
	let (_, model) = reread.models().next().unwrap();
	assert_eq!(model.vertices.len(), 1);
	assert_eq!(&*model.opaque, &[1, 2, 3, 4]);
	assert!(reread.chunks[0].matches_capture().unwrap());
	assert_eq!(reread.chunks[0].captured().map(<[u8]>::len), Some(52 + 144 + 12 + 4 + 68));
}
