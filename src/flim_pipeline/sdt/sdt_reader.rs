//! SDT container reader.
//!
//! Parses the file header, the info text, the measurement description
//! blocks and the chain of data block headers up front. Sample data is
//! only read when a record is requested, so a container holding several
//! large images keeps at most one of them in memory.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use crate::flim_pipeline::common::error::{ConversionError, Result};
use crate::flim_pipeline::sdt::reader::{DecayContainer, DecayReader};
use crate::flim_pipeline::sdt::types::{
    BLOCK_HEADER_LEN, BlockHeader, DecayRecord, FileHeader, HEADER_CHECKSUM, MeasureInfo,
    SampleData, SampleKind,
};

/// Reader for Becker & Hickl SPC `.sdt` files.
pub struct SdtReader;

impl DecayReader for SdtReader {
    fn open(&self, path: &Path) -> Result<Box<dyn DecayContainer>> {
        let file = File::open(path).map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        let sdt = SdtFile::parse(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            records = sdt.block_headers().len(),
            "Opened SDT container"
        );
        Ok(Box::new(sdt))
    }
}

/// An open SDT container over any seekable byte source.
pub struct SdtFile<R> {
    reader: R,
    header: FileHeader,
    info: String,
    measure_info: Vec<MeasureInfo>,
    block_headers: Vec<BlockHeader>,
}

fn truncated(section: &'static str) -> impl Fn(std::io::Error) -> ConversionError {
    move |e| ConversionError::DecodeError(format!("{section}: {e}"))
}

impl<R: Read + Seek> SdtFile<R> {
    pub fn parse(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let header = FileHeader::read_from(&mut reader).map_err(truncated("file header"))?;
        if header.chksum != HEADER_CHECKSUM {
            return Err(ConversionError::DecodeError(format!(
                "not an SDT file (header checksum 0x{:04x})",
                header.chksum
            )));
        }
        debug!(revision = header.revision, "SDT file header");

        let mut info = vec![0u8; header.info_length as usize];
        reader.seek(SeekFrom::Start(u64::from(header.info_offs)))?;
        reader.read_exact(&mut info).map_err(truncated("info block"))?;
        let info = String::from_utf8_lossy(&info).trim().to_string();

        let block_len = header.meas_desc_block_length as usize;
        let mut measure_info = Vec::with_capacity(header.no_of_meas_desc_blocks as usize);
        let mut block = vec![0u8; block_len];
        for i in 0..header.no_of_meas_desc_blocks as u64 {
            let offset = u64::from(header.meas_desc_block_offs) + i * block_len as u64;
            reader.seek(SeekFrom::Start(offset))?;
            reader
                .read_exact(&mut block)
                .map_err(truncated("measurement description block"))?;
            let mi = MeasureInfo::parse(&block)?;
            debug!(
                index = i,
                scan_x = mi.scan_x,
                scan_y = mi.scan_y,
                adc_re = mi.adc_re,
                bin_width = ?mi.bin_width(),
                "Measurement description"
            );
            measure_info.push(mi);
        }

        // Every block needs at least its header, which bounds any count
        // the file can really hold.
        let count = header.data_block_count();
        let stream_len = reader.seek(SeekFrom::End(0))?;
        let max_blocks = usize::try_from(stream_len / BLOCK_HEADER_LEN as u64).unwrap_or(usize::MAX);
        if count > max_blocks {
            return Err(ConversionError::DecodeError(format!(
                "header declares {count} data blocks, file holds at most {max_blocks}"
            )));
        }
        let mut block_headers = Vec::with_capacity(count);
        let mut offset = u64::from(header.data_block_offs);
        for _ in 0..count {
            reader.seek(SeekFrom::Start(offset))?;
            let bh = BlockHeader::read_from(&mut reader).map_err(truncated("data block header"))?;
            debug!(
                block_no = bh.block_no,
                content = bh.kind().content(),
                creation = bh.kind().creation(),
                length = bh.block_length,
                "Data block"
            );
            offset = u64::from(bh.next_block_offs);
            block_headers.push(bh);
        }

        Ok(Self {
            reader,
            header,
            info,
            measure_info,
            block_headers,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn measure_info(&self) -> &[MeasureInfo] {
        &self.measure_info
    }

    pub fn block_headers(&self) -> &[BlockHeader] {
        &self.block_headers
    }

    pub fn read_record(&mut self, index: usize) -> Result<DecayRecord> {
        let bh = *self.block_headers.get(index).ok_or_else(|| {
            ConversionError::DecodeError(format!(
                "record {index} out of range ({} blocks)",
                self.block_headers.len()
            ))
        })?;

        let kind = bh.kind();
        if kind.is_compressed() {
            return Err(ConversionError::UnsupportedFormat(format!(
                "compressed data block {index}"
            )));
        }
        let sample_kind = kind.sample_kind()?;

        let mi = self
            .measure_info
            .get(bh.meas_desc_block_no as usize)
            .ok_or_else(|| {
                ConversionError::DecodeError(format!(
                    "block {index} refers to missing measurement description {}",
                    bh.meas_desc_block_no
                ))
            })?;
        let count = bh.block_length as usize / sample_kind.size_bytes();
        let shape = mi.record_shape(count);

        self.reader.seek(SeekFrom::Start(u64::from(bh.data_offs)))?;
        let samples = read_samples(&mut self.reader, sample_kind, count)
            .map_err(truncated("data block"))?;

        debug!(index, ?shape, "Decoded record");
        Ok(DecayRecord {
            index,
            shape,
            samples,
        })
    }
}

fn read_samples<R: Read>(reader: &mut R, kind: SampleKind, count: usize) -> std::io::Result<SampleData> {
    Ok(match kind {
        SampleKind::U16 => {
            let mut values = vec![0u16; count];
            reader.read_u16_into::<LittleEndian>(&mut values)?;
            SampleData::U16(values)
        }
        SampleKind::U32 => {
            let mut values = vec![0u32; count];
            reader.read_u32_into::<LittleEndian>(&mut values)?;
            SampleData::U32(values)
        }
        SampleKind::F64 => {
            let mut values = vec![0f64; count];
            reader.read_f64_into::<LittleEndian>(&mut values)?;
            SampleData::F64(values)
        }
    })
}

impl<R: Read + Seek> DecayContainer for SdtFile<R> {
    fn len(&self) -> usize {
        self.block_headers.len()
    }

    fn record(&mut self, index: usize) -> Result<DecayRecord> {
        self.read_record(index)
    }
}
