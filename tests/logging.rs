use std::io;
use std::sync::{Arc, Mutex};

use cidrcalc::{classify, is_member, parse_cidr, ranges_overlap, validate_address, Address};


#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);
impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn with_captured_log<F: FnOnce()>(f: F) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    log.text()
}


#[test]
fn test_operations_log_on_entry() {
    let log = with_captured_log(|| {
        let block = parse_cidr("192.168.1.0/24").unwrap();
        let other = parse_cidr("192.168.1.128/25").unwrap();
        let address: Address = "192.168.1.7".parse().unwrap();

        assert!(validate_address("192.168.1.7").is_valid);
        assert!(classify(&address).is_private);
        assert!(is_member(&address, &block));
        assert!(ranges_overlap(&block, &other));
    });

    assert!(log.contains("parsing CIDR notation"), "{}", log);
    assert!(log.contains("validating address"), "{}", log);
    assert!(log.contains("classifying address"), "{}", log);
    assert!(log.contains("checking membership"), "{}", log);
    assert!(log.contains("checking overlap"), "{}", log);
    assert!(log.contains("192.168.1.0/24"), "{}", log);
}
