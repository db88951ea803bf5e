use crate::error::{ImuLogError, Result};

/// Little-endian cursor over a buffered log file
pub struct ImuDataStream<'a> {
    data: &'a [u8],
    pub pos: usize,
    end: usize,
}

impl<'a> ImuDataStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if self.remaining() < N {
            return Err(ImuLogError::UnexpectedEof {
                offset: self.pos,
                needed: N,
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Advance past reserved bytes without interpreting them
    pub fn skip(&mut self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(ImuLogError::UnexpectedEof {
                offset: self.pos,
                needed: count,
            });
        }
        self.pos += count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_little_endian_values() {
        let data = [0x34, 0x12, 0xff, 0xff, 0x78, 0x56, 0x34, 0x12];
        let mut stream = ImuDataStream::new(&data);

        assert_eq!(stream.read_u16_le().unwrap(), 0x1234);
        assert_eq!(stream.read_i16_le().unwrap(), -1);
        assert_eq!(stream.read_u32_le().unwrap(), 0x1234_5678);
        assert!(stream.is_eof());
    }

    #[test]
    fn test_i16_twos_complement() {
        let data = [0x00, 0x80, 0xff, 0x7f, 0x5c, 0xff];
        let mut stream = ImuDataStream::new(&data);

        assert_eq!(stream.read_i16_le().unwrap(), i16::MIN);
        assert_eq!(stream.read_i16_le().unwrap(), i16::MAX);
        assert_eq!(stream.read_i16_le().unwrap(), -164);
    }

    #[test]
    fn test_read_past_end_fails() {
        let data = [0x01, 0x02, 0x03];
        let mut stream = ImuDataStream::new(&data);

        assert!(stream.read_u16_le().is_ok());
        assert!(matches!(
            stream.read_u16_le(),
            Err(ImuLogError::UnexpectedEof { offset: 2, needed: 2 })
        ));
        // Failed read leaves the cursor in place
        assert_eq!(stream.remaining(), 1);
    }

    #[test]
    fn test_skip() {
        let data = [0u8; 10];
        let mut stream = ImuDataStream::new(&data);

        stream.skip(8).unwrap();
        assert_eq!(stream.pos, 8);
        assert!(stream.skip(3).is_err());
        stream.skip(2).unwrap();
        assert!(stream.is_eof());
    }
}
