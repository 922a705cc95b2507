//! Flat little-endian memory image.
//!
//! The loaded binary sits at address 0 and is zero-padded up to the
//! requested size. Any access that does not fit entirely inside the image
//! faults with `EmulatorError::MemoryOutOfRange`.

use byteorder::{ByteOrder, LittleEndian};

use crate::consts;
use crate::error::EmulatorError;

#[derive(Clone, Debug, Default)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Builds an image from `binary`, padded with zeros to at least `size`
    /// bytes.
    pub fn new(binary: &[u8], size: usize) -> Self {
        let mut data = binary.to_vec();
        if data.len() < size {
            data.resize(size, 0);
        }
        Memory { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    fn range(&self, addr: u32, size: usize) -> Result<std::ops::Range<usize>, EmulatorError> {
        let start = addr as usize;
        match start.checked_add(size) {
            Some(end) if end <= self.data.len() => Ok(start..end),
            _ => Err(EmulatorError::MemoryOutOfRange { addr, size }),
        }
    }

    pub fn read_inst(&self, addr: u32) -> Result<u32, EmulatorError> {
        self.read_u32(addr)
    }

    pub fn read_u8(&self, addr: u32) -> Result<u8, EmulatorError> {
        let range = self.range(addr, consts::BYTE_SIZE)?;
        Ok(self.data[range.start])
    }

    pub fn read_u16(&self, addr: u32) -> Result<u16, EmulatorError> {
        let range = self.range(addr, consts::HALFWORD_SIZE)?;
        Ok(LittleEndian::read_u16(&self.data[range]))
    }

    pub fn read_u32(&self, addr: u32) -> Result<u32, EmulatorError> {
        let range = self.range(addr, consts::WORD_SIZE)?;
        Ok(LittleEndian::read_u32(&self.data[range]))
    }

    pub fn write_u8(&mut self, addr: u32, value: u8) -> Result<(), EmulatorError> {
        let range = self.range(addr, consts::BYTE_SIZE)?;
        self.data[range.start] = value;
        Ok(())
    }

    pub fn write_u16(&mut self, addr: u32, value: u16) -> Result<(), EmulatorError> {
        let range = self.range(addr, consts::HALFWORD_SIZE)?;
        LittleEndian::write_u16(&mut self.data[range], value);
        Ok(())
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> Result<(), EmulatorError> {
        let range = self.range(addr, consts::WORD_SIZE)?;
        LittleEndian::write_u32(&mut self.data[range], value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_is_padded() {
        let image = Memory::new(&[0x93, 0x00, 0x50, 0x00], 16);
        assert_eq!(image.len(), 16);
        assert_eq!(image.read_inst(0).unwrap(), 0x00500093);
        assert_eq!(image.read_u32(12).unwrap(), 0);
    }

    #[test]
    fn image_larger_than_size_is_kept_whole() {
        let image = Memory::new(&[1; 32], 8);
        assert_eq!(image.len(), 32);
        assert_eq!(image.read_u8(31).unwrap(), 1);
    }

    #[test]
    fn little_endian_access() {
        let mut image = Memory::new(&[], 16);
        image.write_u32(4, 0x1122_3344).unwrap();
        assert_eq!(image.read_u8(4).unwrap(), 0x44);
        assert_eq!(image.read_u16(6).unwrap(), 0x1122);
        image.write_u16(8, 0xbeef).unwrap();
        image.write_u8(10, 0x7f).unwrap();
        assert_eq!(image.read_u32(8).unwrap(), 0x007f_beef);
    }

    #[test]
    fn unaligned_word_inside_image() {
        let mut image = Memory::new(&[], 8);
        image.write_u32(1, 0xaabb_ccdd).unwrap();
        assert_eq!(image.read_u32(1).unwrap(), 0xaabb_ccdd);
    }

    #[test]
    fn out_of_range_faults() {
        let mut image = Memory::new(&[], 8);
        assert_eq!(
            image.read_u32(5),
            Err(EmulatorError::MemoryOutOfRange { addr: 5, size: 4 })
        );
        assert_eq!(
            image.write_u8(8, 0),
            Err(EmulatorError::MemoryOutOfRange { addr: 8, size: 1 })
        );
        assert_eq!(
            image.read_u16(0xffff_ffff),
            Err(EmulatorError::MemoryOutOfRange { addr: 0xffff_ffff, size: 2 })
        );
        assert!(image.read_u32(4).is_ok());
    }
}
