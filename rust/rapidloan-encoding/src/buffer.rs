//! Exactly-sized defensive buffer copies.

/// Copy bytes into a freshly allocated buffer of exactly their length.
///
/// Platform credential APIs reject buffer views that alias a larger
/// allocation at a nonzero offset, so every byte sequence that crosses that
/// boundary must be a standalone, exact-length buffer. The returned
/// `Box<[u8]>` shares no memory with the input.
#[must_use]
pub fn to_exact_buffer(bytes: impl AsRef<[u8]>) -> Box<[u8]> {
    let bytes = bytes.as_ref();
    let mut buffer = Vec::with_capacity(bytes.len());
    buffer.extend_from_slice(bytes);
    buffer.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_copies_content_exactly() {
        let source = vec![9u8, 8, 7, 6, 5];
        let buffer = to_exact_buffer(&source);
        assert_eq!(buffer.as_ref(), source.as_slice());
        assert_eq!(buffer.len(), source.len());
    }

    #[test]
    fn it_handles_empty_input() {
        assert_eq!(to_exact_buffer([]).len(), 0);
    }

    #[test]
    fn it_copies_out_of_a_larger_allocation() {
        let backing = vec![0u8; 128];
        let buffer = to_exact_buffer(&backing[32..36]);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.as_ref(), &[0, 0, 0, 0]);
    }
}
