use embedded_io::Write;

use crate::log::warn;
use crate::telemetry::TelemetrySink;

/// Telemetry over any byte stream, one CR LF terminated line per report.
pub struct SerialSink<W> {
    port: W,
}

impl<W: Write> SerialSink<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    pub fn port(&mut self) -> &mut W {
        &mut self.port
    }

    fn write_line(&mut self, line: &str) -> Result<(), W::Error> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\r\n")?;
        self.port.flush()
    }
}

impl<W: Write> TelemetrySink for SerialSink<W> {
    fn emit(&mut self, line: &str) {
        if self.write_line(line).is_err() {
            warn!("Serial telemetry write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;
    use std::vec::Vec;

    use embedded_io::{ErrorKind, ErrorType};

    use super::*;

    #[derive(Default)]
    struct Wire(Vec<u8>);

    impl ErrorType for Wire {
        type Error = Infallible;
    }

    impl Write for Wire {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn lines_end_with_crlf() {
        let mut sink = SerialSink::new(Wire::default());

        sink.emit(r#"{"temperature_1":23.5}"#);
        sink.emit("x");

        assert_eq!(
            sink.port().0.as_slice(),
            b"{\"temperature_1\":23.5}\r\nx\r\n"
        );
    }

    /// A link that refuses every write while unplugged.
    #[derive(Default)]
    struct Cable {
        unplugged: bool,
        wire: Vec<u8>,
    }

    impl ErrorType for Cable {
        type Error = ErrorKind;
    }

    impl Write for Cable {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.unplugged {
                return Err(ErrorKind::NotConnected);
            }
            self.wire.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn failed_writes_are_dropped() {
        let mut sink = SerialSink::new(Cable::default());

        sink.port().unplugged = true;
        sink.emit(r#"{"temperature_1":23.5}"#);
        assert!(sink.port().wire.is_empty());

        sink.port().unplugged = false;
        sink.emit(r#"{"temperature_1":24}"#);
        assert_eq!(sink.port().wire.as_slice(), b"{\"temperature_1\":24}\r\n");
    }
}
