//! Scripted I2C bus for host tests

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};
use std::collections::VecDeque;
use std::vec::Vec;

/// One completed bus transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
    WriteRead { addr: u8, command: Vec<u8>, len: usize },
}

/// Bus that logs every transfer and answers reads from a byte script
///
/// With `set_nack(true)` every transfer fails as if no device answered,
/// which is how a disconnected shield looks.
#[derive(Debug)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: Vec<I2cTransaction>,
    replies: VecDeque<u8>,
    nack: bool,
}

impl MockI2c {
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            transactions: Vec::new(),
            replies: VecDeque::new(),
            nack: false,
        }
    }

    pub fn transactions(&self) -> &[I2cTransaction] {
        &self.transactions
    }

    /// Queue bytes for the following reads
    pub fn push_reply(&mut self, bytes: &[u8]) {
        self.replies.extend(bytes.iter().copied());
    }

    pub fn set_nack(&mut self, nack: bool) {
        self.nack = nack;
    }

    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    fn acked(&self) -> Result<()> {
        match self.nack {
            true => Err(PlatformError::I2c(I2cError::Nack)),
            false => Ok(()),
        }
    }

    // Unscripted bytes read as 0xFF, like a floating bus
    fn answer(&mut self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = self.replies.pop_front().unwrap_or(0xFF);
        }
    }
}

impl I2cInterface for MockI2c {
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.acked()?;
        self.transactions.push(I2cTransaction::Write {
            addr,
            data: data.to_vec(),
        });
        Ok(())
    }

    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.acked()?;
        self.transactions.push(I2cTransaction::Read {
            addr,
            len: buffer.len(),
        });
        self.answer(buffer);
        Ok(())
    }

    async fn write_read(&mut self, addr: u8, command: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.acked()?;
        self.transactions.push(I2cTransaction::WriteRead {
            addr,
            command: command.to_vec(),
            len: buffer.len(),
        });
        self.answer(buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_follow_the_script() {
        let mut i2c = MockI2c::new(I2cConfig::default());
        i2c.push_reply(&[0x12, 0x34]);

        let mut buf = [0u8; 3];
        i2c.write_read(0x76, &[0xA0], &mut buf).await.unwrap();

        assert_eq!(buf, [0x12, 0x34, 0xFF]);
        assert_eq!(
            i2c.transactions(),
            &[I2cTransaction::WriteRead {
                addr: 0x76,
                command: vec![0xA0],
                len: 3
            }]
        );
    }

    #[tokio::test]
    async fn nack_fails_without_logging() {
        let mut i2c = MockI2c::new(I2cConfig::default());
        i2c.set_nack(true);

        assert_eq!(
            i2c.write(0x40, &[0xFE]).await,
            Err(PlatformError::I2c(I2cError::Nack))
        );
        assert!(i2c.transactions().is_empty());
        assert_eq!(i2c.config().frequency, 100_000);
    }
}
