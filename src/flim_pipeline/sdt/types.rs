//! SDT container and decay record types

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::flim_pipeline::common::error::{ConversionError, Result};

/// Size of the fixed file header at offset 0.
pub const FILE_HEADER_LEN: usize = 42;

/// Size of the header preceding every data block.
pub const BLOCK_HEADER_LEN: usize = 22;

/// Value the header checksum field must hold.
pub const HEADER_CHECKSUM: u16 = 0x55AA;

/// Sentinel in `no_of_data_blocks` meaning the real count lives in `reserved1`.
pub const EXTENDED_BLOCK_COUNT: u16 = 0x7FFF;

/// Shortest measurement description block that still carries the scan size.
pub const MIN_MEASURE_INFO_LEN: usize = 185;

/// Byte offsets inside a measurement description block.
pub(crate) mod measure_offsets {
    pub const TIME: usize = 0;
    pub const TIME_LEN: usize = 9;
    pub const DATE: usize = 9;
    pub const DATE_LEN: usize = 11;
    pub const MOD_SER_NO: usize = 20;
    pub const MOD_SER_NO_LEN: usize = 16;
    pub const MEAS_MODE: usize = 36;
    pub const TAC_R: usize = 68;
    pub const TAC_G: usize = 72;
    pub const ADC_RE: usize = 86;
    pub const MOD_TYPE: usize = 121;
    pub const MOD_TYPE_LEN: usize = 16;
    pub const PIX_TIME: usize = 169;
    pub const SCAN_X: usize = 177;
    pub const SCAN_Y: usize = 181;
}

/// Fixed file header of an SDT container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub revision: i16,
    pub info_offs: u32,
    pub info_length: u16,
    pub setup_offs: u32,
    pub setup_length: u16,
    pub data_block_offs: u32,
    pub no_of_data_blocks: u16,
    pub data_block_length: u32,
    pub meas_desc_block_offs: u32,
    pub no_of_meas_desc_blocks: u16,
    pub meas_desc_block_length: u16,
    pub header_valid: u16,
    pub reserved1: u32,
    pub reserved2: u16,
    pub chksum: u16,
}

impl FileHeader {
    pub fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            revision: reader.read_i16::<LittleEndian>()?,
            info_offs: reader.read_u32::<LittleEndian>()?,
            info_length: reader.read_u16::<LittleEndian>()?,
            setup_offs: reader.read_u32::<LittleEndian>()?,
            setup_length: reader.read_u16::<LittleEndian>()?,
            data_block_offs: reader.read_u32::<LittleEndian>()?,
            no_of_data_blocks: reader.read_u16::<LittleEndian>()?,
            data_block_length: reader.read_u32::<LittleEndian>()?,
            meas_desc_block_offs: reader.read_u32::<LittleEndian>()?,
            no_of_meas_desc_blocks: reader.read_u16::<LittleEndian>()?,
            meas_desc_block_length: reader.read_u16::<LittleEndian>()?,
            header_valid: reader.read_u16::<LittleEndian>()?,
            reserved1: reader.read_u32::<LittleEndian>()?,
            reserved2: reader.read_u16::<LittleEndian>()?,
            chksum: reader.read_u16::<LittleEndian>()?,
        })
    }

    /// Number of data blocks, following the extended count when the
    /// 16-bit field overflowed.
    pub fn data_block_count(&self) -> usize {
        if self.no_of_data_blocks == EXTENDED_BLOCK_COUNT {
            self.reserved1 as usize
        } else {
            self.no_of_data_blocks as usize
        }
    }
}

/// Header preceding each data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_no: i16,
    pub data_offs: u32,
    pub next_block_offs: u32,
    pub block_type: u16,
    pub meas_desc_block_no: u16,
    pub lblock_no: u32,
    /// Payload size in bytes
    pub block_length: u32,
}

impl BlockHeader {
    pub fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            block_no: reader.read_i16::<LittleEndian>()?,
            data_offs: reader.read_u32::<LittleEndian>()?,
            next_block_offs: reader.read_u32::<LittleEndian>()?,
            block_type: reader.read_u16::<LittleEndian>()?,
            meas_desc_block_no: reader.read_u16::<LittleEndian>()?,
            lblock_no: reader.read_u32::<LittleEndian>()?,
            block_length: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn kind(&self) -> BlockType {
        BlockType(self.block_type)
    }
}

/// Packed `block_type` bit field of a data block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockType(pub u16);

impl BlockType {
    const CREATION_MASK: u16 = 0x000F;
    const CONTENT_MASK: u16 = 0x00F0;
    const DTYPE_MASK: u16 = 0x0F00;
    const COMPRESSED: u16 = 0x1000;

    pub fn creation(&self) -> &'static str {
        match self.0 & Self::CREATION_MASK {
            0x0 => "NOT_USED",
            0x1 => "MEAS_DATA",
            0x2 => "FLOW_DATA",
            0x3 => "MEAS_DATA_FROM_FILE",
            0x4 => "CALC_DATA",
            0x5 => "SIM_DATA",
            0x8 => "FIFO_DATA",
            0x9 => "FIFO_DATA_FROM_FILE",
            0xA => "MOM_DATA",
            0xB => "MOM_DATA_FROM_FILE",
            _ => "UNKNOWN",
        }
    }

    pub fn content(&self) -> &'static str {
        match self.0 & Self::CONTENT_MASK {
            0x00 => "DECAY_BLOCK",
            0x10 => "PAGE_BLOCK",
            0x20 => "FCS_BLOCK",
            0x30 => "FIDA_BLOCK",
            0x40 => "FILDA_BLOCK",
            0x50 => "MCS_BLOCK",
            0x60 => "IMG_BLOCK",
            0x70 => "MCSTA_BLOCK",
            0x80 => "IMG_MCS_BLOCK",
            0x90 => "MOM_BLOCK",
            0xA0 => "IMG_INT_BLOCK",
            0xB0 => "IMG_WF_BLOCK",
            0xC0 => "MCS_INT_BLOCK",
            _ => "UNKNOWN",
        }
    }

    pub fn sample_kind(&self) -> Result<SampleKind> {
        match self.0 & Self::DTYPE_MASK {
            0x000 => Ok(SampleKind::U16),
            0x100 => Ok(SampleKind::U32),
            0x200 => Ok(SampleKind::F64),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "block sample type 0x{other:03x}"
            ))),
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }
}

/// Measurement settings a data block refers to. Only the fields this
/// crate uses are decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureInfo {
    pub time: String,
    pub date: String,
    pub mod_ser_no: String,
    pub meas_mode: i16,
    /// TAC range in seconds
    pub tac_r: f32,
    /// TAC gain
    pub tac_g: i16,
    /// ADC resolution, i.e. number of time bins
    pub adc_re: i16,
    pub mod_type: String,
    pub pix_time: f32,
    pub scan_x: i32,
    pub scan_y: i32,
}

impl MeasureInfo {
    pub fn parse(block: &[u8]) -> Result<Self> {
        use measure_offsets::*;

        if block.len() < MIN_MEASURE_INFO_LEN {
            return Err(ConversionError::DecodeError(format!(
                "measurement description block is {} bytes, need at least {}",
                block.len(),
                MIN_MEASURE_INFO_LEN
            )));
        }

        Ok(Self {
            time: ascii_field(&block[TIME..TIME + TIME_LEN]),
            date: ascii_field(&block[DATE..DATE + DATE_LEN]),
            mod_ser_no: ascii_field(&block[MOD_SER_NO..MOD_SER_NO + MOD_SER_NO_LEN]),
            meas_mode: LittleEndian::read_i16(&block[MEAS_MODE..]),
            tac_r: LittleEndian::read_f32(&block[TAC_R..]),
            tac_g: LittleEndian::read_i16(&block[TAC_G..]),
            adc_re: LittleEndian::read_i16(&block[ADC_RE..]),
            mod_type: ascii_field(&block[MOD_TYPE..MOD_TYPE + MOD_TYPE_LEN]),
            pix_time: LittleEndian::read_f32(&block[PIX_TIME..]),
            scan_x: LittleEndian::read_i32(&block[SCAN_X..]),
            scan_y: LittleEndian::read_i32(&block[SCAN_Y..]),
        })
    }

    /// Shape of a block holding `sample_count` samples measured with these
    /// settings. Falls back to a flat shape when the count does not tile
    /// the scan.
    pub fn record_shape(&self, sample_count: usize) -> Vec<usize> {
        let y = usize::try_from(self.scan_y).unwrap_or(0);
        let x = usize::try_from(self.scan_x).unwrap_or(0);
        let t = usize::try_from(self.adc_re).unwrap_or(0);
        let per_frame = y.checked_mul(x).and_then(|n| n.checked_mul(t)).unwrap_or(0);

        if per_frame == 0 || sample_count == 0 || sample_count % per_frame != 0 {
            return vec![sample_count];
        }

        match sample_count / per_frame {
            1 => vec![y, x, t],
            frames => vec![frames, y, x, t],
        }
    }

    /// Width of one time bin in seconds.
    pub fn bin_width(&self) -> Option<f64> {
        let denominator = f64::from(self.tac_g) * f64::from(self.adc_re);
        if denominator > 0.0 {
            Some(f64::from(self.tac_r) / denominator)
        } else {
            None
        }
    }
}

fn ascii_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    U16,
    U32,
    F64,
}

impl SampleKind {
    pub fn size_bytes(&self) -> usize {
        match self {
            SampleKind::U16 => 2,
            SampleKind::U32 => 4,
            SampleKind::F64 => 8,
        }
    }
}

/// Decoded samples of one data block, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    U16(Vec<u16>),
    U32(Vec<u32>),
    F64(Vec<f64>),
}

impl SampleData {
    pub fn len(&self) -> usize {
        match self {
            SampleData::U16(values) => values.len(),
            SampleData::U32(values) => values.len(),
            SampleData::F64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> SampleKind {
        match self {
            SampleData::U16(_) => SampleKind::U16,
            SampleData::U32(_) => SampleKind::U32,
            SampleData::F64(_) => SampleKind::F64,
        }
    }
}

/// One decay-curve record as stored in the container
#[derive(Debug, Clone, PartialEq)]
pub struct DecayRecord {
    /// Zero-based position of the block within the container
    pub index: usize,
    /// Array shape, time bins last
    pub shape: Vec<usize>,
    pub samples: SampleData,
}
