//! In-memory SDT container builder for tests.

use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::flim_pipeline::sdt::types::{
    BLOCK_HEADER_LEN, EXTENDED_BLOCK_COUNT, FILE_HEADER_LEN, HEADER_CHECKSUM, measure_offsets,
};

const MEASURE_INFO_LEN: usize = 215;
const INFO_TEXT: &str = "*IDENTIFICATION\r\n  ID        : SPC Setup & Data File\r\n*END\r\n";

struct Measurement {
    scan_y: i32,
    scan_x: i32,
    adc_re: i16,
}

struct Block {
    block_type: u16,
    measure: u16,
    payload: Vec<u8>,
}

pub(crate) struct SdtFixture {
    measurements: Vec<Measurement>,
    blocks: Vec<Block>,
    checksum: u16,
    extended_count: bool,
    measure_info_len: usize,
}

impl SdtFixture {
    pub fn new() -> Self {
        Self {
            measurements: Vec::new(),
            blocks: Vec::new(),
            checksum: HEADER_CHECKSUM,
            extended_count: false,
            measure_info_len: MEASURE_INFO_LEN,
        }
    }

    /// Adds a measurement description with the given scan size.
    pub fn measurement(mut self, scan_y: i32, scan_x: i32, adc_re: i16) -> Self {
        self.measurements.push(Measurement {
            scan_y,
            scan_x,
            adc_re,
        });
        self
    }

    pub fn block_u16(self, values: &[u16]) -> Self {
        let mut payload = vec![0u8; values.len() * 2];
        LittleEndian::write_u16_into(values, &mut payload);
        self.block_raw(0x0001, 0, payload)
    }

    pub fn block_u32(self, values: &[u32]) -> Self {
        let mut payload = vec![0u8; values.len() * 4];
        LittleEndian::write_u32_into(values, &mut payload);
        self.block_raw(0x0101, 0, payload)
    }

    pub fn block_f64(self, values: &[f64]) -> Self {
        let mut payload = vec![0u8; values.len() * 8];
        LittleEndian::write_f64_into(values, &mut payload);
        self.block_raw(0x0201, 0, payload)
    }

    pub fn block_raw(mut self, block_type: u16, measure: u16, payload: Vec<u8>) -> Self {
        self.blocks.push(Block {
            block_type,
            measure,
            payload,
        });
        self
    }

    pub fn checksum(mut self, checksum: u16) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn extended_block_count(mut self) -> Self {
        self.extended_count = true;
        self
    }

    pub fn measure_info_len(mut self, len: usize) -> Self {
        self.measure_info_len = len;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let info_offs = FILE_HEADER_LEN;
        let meas_offs = info_offs + INFO_TEXT.len();
        let data_offs = meas_offs + self.measurements.len() * self.measure_info_len;

        let (no_of_data_blocks, reserved1) = if self.extended_count {
            (EXTENDED_BLOCK_COUNT, self.blocks.len() as u32)
        } else {
            (self.blocks.len() as u16, 0)
        };

        let mut out = Vec::new();
        out.write_i16::<LittleEndian>(15).unwrap();
        out.write_u32::<LittleEndian>(info_offs as u32).unwrap();
        out.write_u16::<LittleEndian>(INFO_TEXT.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(meas_offs as u32).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(data_offs as u32).unwrap();
        out.write_u16::<LittleEndian>(no_of_data_blocks).unwrap();
        out.write_u32::<LittleEndian>(self.blocks.first().map_or(0, |b| b.payload.len() as u32))
            .unwrap();
        out.write_u32::<LittleEndian>(meas_offs as u32).unwrap();
        out.write_u16::<LittleEndian>(self.measurements.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.measure_info_len as u16).unwrap();
        out.write_u16::<LittleEndian>(0x5555).unwrap();
        out.write_u32::<LittleEndian>(reserved1).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.checksum).unwrap();
        assert_eq!(out.len(), FILE_HEADER_LEN);

        out.extend_from_slice(INFO_TEXT.as_bytes());

        for m in &self.measurements {
            let mut block = vec![0u8; self.measure_info_len.max(MEASURE_INFO_LEN)];
            block[measure_offsets::TIME..measure_offsets::TIME + 8].copy_from_slice(b"12:34:56");
            block[measure_offsets::DATE..measure_offsets::DATE + 10].copy_from_slice(b"2024-03-01");
            block[measure_offsets::MOD_TYPE..measure_offsets::MOD_TYPE + 7].copy_from_slice(b"SPC-150");
            LittleEndian::write_i16(&mut block[measure_offsets::MEAS_MODE..], 13);
            LittleEndian::write_f32(&mut block[measure_offsets::TAC_R..], 5.0e-8);
            LittleEndian::write_i16(&mut block[measure_offsets::TAC_G..], 4);
            LittleEndian::write_i16(&mut block[measure_offsets::ADC_RE..], m.adc_re);
            LittleEndian::write_i32(&mut block[measure_offsets::SCAN_X..], m.scan_x);
            LittleEndian::write_i32(&mut block[measure_offsets::SCAN_Y..], m.scan_y);
            block.truncate(self.measure_info_len);
            out.extend_from_slice(&block);
        }

        for (i, b) in self.blocks.iter().enumerate() {
            let data_offs = out.len() + BLOCK_HEADER_LEN;
            let next = data_offs + b.payload.len();
            out.write_i16::<LittleEndian>(i as i16 + 1).unwrap();
            out.write_u32::<LittleEndian>(data_offs as u32).unwrap();
            out.write_u32::<LittleEndian>(next as u32).unwrap();
            out.write_u16::<LittleEndian>(b.block_type).unwrap();
            out.write_u16::<LittleEndian>(b.measure).unwrap();
            out.write_u32::<LittleEndian>(i as u32).unwrap();
            out.write_u32::<LittleEndian>(b.payload.len() as u32).unwrap();
            out.extend_from_slice(&b.payload);
        }

        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) {
        std::fs::write(path, self.build()).unwrap();
    }
}
