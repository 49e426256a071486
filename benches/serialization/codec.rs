use criterion::{BenchmarkId, Criterion, Throughput};
use librest::serialization::{Codec, Format, SerializerKind};
use serde::{Deserialize, Serialize};
use std::hint::black_box;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Parameter {
    key: String,
    value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "result")]
struct ApiResult<T> {
    code: String,
    successful: bool,
    message: String,
    #[serde(rename = "parameter", default)]
    parameters: Vec<Parameter>,
    value: T,
}

const CODECS: [(Format, SerializerKind, &str); 4] = [
    (Format::Xml, SerializerKind::ContractBased, "xml-contract"),
    (Format::Xml, SerializerKind::ReflectionBased, "xml-reflection"),
    (Format::Json, SerializerKind::ContractBased, "json-contract"),
    (Format::Json, SerializerKind::ReflectionBased, "json-reflection"),
];

fn sample() -> ApiResult<Vec<u32>> {
    ApiResult {
        code: "OK".into(),
        successful: true,
        message: "readings".into(),
        parameters: (0..16)
            .map(|i| Parameter {
                key: format!("sensor{i}"),
                value: format!("{}", i * 7),
            })
            .collect(),
        value: (0..64).collect(),
    }
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let value = sample();
    for (format, serializer, name) in CODECS {
        let codec = Codec::new(format, serializer);
        let size = codec.encode(&value).expect("Failed to encode").len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &codec, |b, codec| {
            b.iter(|| codec.encode(black_box(&value)).expect("Failed to encode"))
        });
    }
    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let value = sample();
    for (format, serializer, name) in CODECS {
        let codec = Codec::new(format, serializer);
        let bytes = codec.encode(&value).expect("Failed to encode");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| {
                let decoded: ApiResult<Vec<u32>> = codec.decode(black_box(bytes)).expect("Failed to decode");
                decoded
            })
        });
    }
    group.finish();
}
