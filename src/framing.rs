use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, LinesCodecError};

/// One framed input line. Oversized and non-UTF-8 lines are frames too, so
/// the session can reject them and keep reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Line(String),
    TooLong,
    NotUtf8,
}

/// Newline-delimited decoder that never fails on line content. Only I/O
/// errors surface as `Err`.
#[derive(Debug)]
pub struct CommandLineCodec {
    max_length: usize,
    /// Bytes already scanned for a newline.
    next_index: usize,
    /// Dropping the tail of an oversized line until its newline.
    discarding: bool,
}

impl CommandLineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: false,
        }
    }

    fn frame(&self, raw: &[u8]) -> Inbound {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.len() > self.max_length {
            return Inbound::TooLong;
        }
        match std::str::from_utf8(raw) {
            Ok(line) => Inbound::Line(line.to_string()),
            Err(_) => Inbound::NotUtf8,
        }
    }
}

impl Decoder for CommandLineCodec {
    type Item = Inbound;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Inbound>, LinesCodecError> {
        loop {
            let newline = buf[self.next_index..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|i| i + self.next_index);

            match newline {
                Some(idx) if self.discarding => {
                    buf.advance(idx + 1);
                    self.discarding = false;
                    self.next_index = 0;
                    return Ok(Some(Inbound::TooLong));
                }
                None if self.discarding => {
                    buf.advance(buf.len());
                    self.next_index = 0;
                    return Ok(None);
                }
                Some(idx) => {
                    let line = buf.split_to(idx + 1);
                    self.next_index = 0;
                    return Ok(Some(self.frame(&line[..idx])));
                }
                None if buf.len() > self.max_length => {
                    self.discarding = true;
                }
                None => {
                    self.next_index = buf.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Inbound>, LinesCodecError> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }
        if self.discarding {
            self.discarding = false;
            return Ok(Some(Inbound::TooLong));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        let line = buf.split_to(buf.len());
        self.next_index = 0;
        Ok(Some(self.frame(&line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut CommandLineCodec, input: &[u8]) -> Vec<Inbound> {
        let mut buf = BytesMut::from(input);
        let mut frames = Vec::new();
        while let Some(frame) = codec.decode(&mut buf).unwrap() {
            frames.push(frame);
        }
        while let Some(frame) = codec.decode_eof(&mut buf).unwrap() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn splits_lines_and_strips_cr() {
        let mut codec = CommandLineCodec::new(64);
        assert_eq!(
            decode_all(&mut codec, b"PF\r\nPT\nQ"),
            vec![
                Inbound::Line("PF".into()),
                Inbound::Line("PT".into()),
                Inbound::Line("Q".into()),
            ]
        );
    }

    #[test]
    fn oversized_line_is_one_frame_and_reading_resumes() {
        let mut codec = CommandLineCodec::new(8);
        let mut input = vec![b'X'; 40];
        input.extend_from_slice(b"\nPF\n");
        assert_eq!(
            decode_all(&mut codec, &input),
            vec![Inbound::TooLong, Inbound::Line("PF".into())]
        );
    }

    #[test]
    fn oversized_line_split_across_reads() {
        let mut codec = CommandLineCodec::new(8);
        let mut buf = BytesMut::from(&[b'X'; 20][..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"XXXX\nPT\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Inbound::TooLong));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Inbound::Line("PT".into())));
    }

    #[test]
    fn oversized_tail_at_eof() {
        let mut codec = CommandLineCodec::new(4);
        assert_eq!(decode_all(&mut codec, b"PF\nXXXXXXXX"), vec![Inbound::Line("PF".into()), Inbound::TooLong]);
    }

    #[test]
    fn invalid_utf8_is_its_own_frame() {
        let mut codec = CommandLineCodec::new(64);
        assert_eq!(
            decode_all(&mut codec, b"BOOK \xff\xfe\nPF\n"),
            vec![Inbound::NotUtf8, Inbound::Line("PF".into())]
        );
    }
}
