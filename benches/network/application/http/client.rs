use criterion::{Criterion, Throughput};
use librest::network::application::http::{Client, Get, Headers, Method, NetworkExecutor, Request};
use librest::network::error::Error;
use librest::network::{Close, Connect, Connection, Read, Write};
use librest::serialization::Format;
use serde::Deserialize;

/// Answers with a canned response and discards whatever is written.
struct LoopbackConnection {
    reply: &'static [u8],
    read_pos: usize,
}

impl Read for LoopbackConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.reply[self.read_pos..];
        let len = buf.len().min(remaining.len());
        buf[..len].copy_from_slice(&remaining[..len]);
        self.read_pos += len;
        Ok(len)
    }
}

impl Write for LoopbackConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for LoopbackConnection {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for LoopbackConnection {}

struct Loopback;

impl Connect for Loopback {
    type Connection = LoopbackConnection;
    type Error = Error;

    fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> {
        Ok(LoopbackConnection {
            reply: REPLY,
            read_pos: 0,
        })
    }
}

const REPLY: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 41\r\n\r\n{\"id\":7,\"name\":\"boiler\",\"online\":true}   ";

#[derive(Deserialize)]
#[allow(dead_code)]
struct Device {
    id: u32,
    name: String,
    online: bool,
}

pub fn bench_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("request");
    group.throughput(Throughput::Bytes(REPLY.len() as u64));
    group.bench_function("request", |b| {
        let request = Request::new(Method::Get, "http://device.local/devices/7", Headers::new(), None);
        b.iter(|| {
            let mut client = Client::new(LoopbackConnection {
                reply: REPLY,
                read_pos: 0,
            });
            client.request(&request).expect("Failed to request")
        })
    });
    group.finish();
}

pub fn bench_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch");
    group.throughput(Throughput::Bytes(REPLY.len() as u64));
    group.bench_function("fetch_json", |b| {
        let mut get = Get::with_executor("http://device.local/devices/7", NetworkExecutor::new(Loopback))
            .format(Format::Json);
        b.iter(|| get.fetch::<Device>().expect("Failed to fetch"))
    });
    group.finish();
}
