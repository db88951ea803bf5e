use serde::Serialize;

/// A single sample as stored by the logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RawReading {
    /// Free-running microsecond counter, wraps at u32::MAX
    pub timestamp: u32,
    /// Raw accelerometer counts (ax, ay, az) for revisions that record them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accel: Option<[i16; 3]>,
    pub gx: i16,
    pub gy: i16,
    pub gz: i16,
}

impl RawReading {
    pub fn new(timestamp: u32, gx: i16, gy: i16, gz: i16) -> Self {
        Self {
            timestamp,
            accel: None,
            gx,
            gy,
            gz,
        }
    }

    pub fn gyro(&self) -> [i16; 3] {
        [self.gx, self.gy, self.gz]
    }
}
