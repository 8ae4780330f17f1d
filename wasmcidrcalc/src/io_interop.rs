use serde::Serialize;

use cidrcalc::CidrError;

use crate::{BUFFER_SIZE, U16_BUFFER, U16_BUFFER_LEN};


#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "wasm_interop")]
extern "C" {
    fn append_output();
    fn append_error();
}

// native builds (e.g. `cargo test`) have no page to talk to
#[cfg(not(target_arch = "wasm32"))]
unsafe fn append_output() {}
#[cfg(not(target_arch = "wasm32"))]
unsafe fn append_error() {}


/// Writes text into the shared buffer as UTF-16, calling `append_func` every time the buffer is
/// full and once more for the remainder.
pub(crate) fn write_to<F: FnMut(&[u16])>(buf: &str, mut append_func: F) {
    let buffer = std::ptr::addr_of_mut!(U16_BUFFER);
    let size = std::ptr::addr_of_mut!(BUFFER_SIZE);

    let mut offset = 0;
    for word in buf.encode_utf16() {
        unsafe { (*buffer)[offset] = word };
        offset += 1;
        if offset == U16_BUFFER_LEN {
            // we've hit the limit; push out what we have
            unsafe { *size = offset };
            append_func(unsafe { &(&(*buffer))[..offset] });
            offset = 0;
        }
    }
    if offset > 0 {
        // push out last batch
        unsafe { *size = offset };
        append_func(unsafe { &(&(*buffer))[..offset] });
    }
}

pub(crate) fn write_to_output(buf: &str) {
    write_to(buf, |_chunk| unsafe { append_output() });
}
pub(crate) fn write_to_error(buf: &str) {
    write_to(buf, |_chunk| unsafe { append_error() });
}


/// The document written to the error stream when an operation fails.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorDocument<'a> {
    pub error: &'a CidrError,
}

/// Renders a value as JSON.
pub(crate) fn to_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(s) => s,
        // all our documents consist of strings, numbers, booleans and sequences thereof
        Err(e) => format!("{{\"error\":{{\"kind\":\"Internal\",\"message\":{:?}}}}}", e.to_string()),
    }
}

pub(crate) fn output_json<T: Serialize>(value: &T) {
    write_to_output(&to_json(value));
}

pub(crate) fn output_error(error: &CidrError) {
    write_to_error(&to_json(&ErrorDocument { error }));
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write_to_chunks() {
        let text: String = std::iter::repeat('x').take(U16_BUFFER_LEN + 10).collect();
        let mut chunk_lengths = Vec::new();
        write_to(&text, |chunk| chunk_lengths.push(chunk.len()));
        assert_eq!(vec![U16_BUFFER_LEN, 10], chunk_lengths);

        let mut chunks: Vec<String> = Vec::new();
        write_to("h\u{e9}llo \u{1F310}", |chunk| chunks.push(String::from_utf16(chunk).unwrap()));
        assert_eq!(vec![String::from("h\u{e9}llo \u{1F310}")], chunks);
    }

    #[test]
    fn test_error_document() {
        let error = cidrcalc::parse_cidr("10.0.0.0/33").unwrap_err();
        let json: serde_json::Value = serde_json::from_str(&to_json(&ErrorDocument { error: &error })).unwrap();
        assert_eq!("PrefixOutOfRange", json["error"]["kind"]);
        assert_eq!("prefix length 33 is out of range for IPv4 (0 <= n <= 32)", json["error"]["message"]);
    }
}
