//! Published Test Vectors
//!
//! Checks keystream, EEA3, EIA3 and ZUC-256 MAC output against the JSON
//! fixture, through both the single-buffer and the N-buffer entry points.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use zuc_mb::{iv, Auth256Job, AuthJob, CipherJob, TagSize};

#[derive(Deserialize)]
struct KeystreamVector {
    name: String,
    variant: String,
    key: String,
    iv: String,
    keystream: String,
}

#[derive(Deserialize)]
struct Eea3Vector {
    name: String,
    key: String,
    count: u32,
    bearer: u8,
    direction: u8,
    plaintext: String,
    ciphertext: String,
}

#[derive(Deserialize)]
struct Eia3Vector {
    name: String,
    key: String,
    count: u32,
    bearer: u8,
    direction: u8,
    length_bits: u32,
    message: String,
    mac: String,
}

#[derive(Deserialize)]
struct Mac256Vector {
    name: String,
    key: String,
    iv: String,
    fill: u8,
    length_bits: u32,
    tag: String,
}

#[derive(Deserialize)]
struct TestVectors {
    keystream: Vec<KeystreamVector>,
    eea3: Vec<Eea3Vector>,
    eia3: Vec<Eia3Vector>,
    zuc256_mac: Vec<Mac256Vector>,
}

fn load() -> TestVectors {
    let file = File::open("tests/test_vectors.json").expect("Failed to open test_vectors.json");
    serde_json::from_reader(BufReader::new(file)).expect("Failed to parse JSON")
}

fn array<const N: usize>(text: &str) -> [u8; N] {
    hex::decode(text).unwrap().try_into().unwrap()
}

#[test]
fn test_keystream_vectors() {
    for vector in load().keystream {
        let expected = hex::decode(&vector.keystream).unwrap();
        let zeros = vec![0u8; expected.len()];
        let mut out = vec![0u8; expected.len()];
        match vector.variant.as_str() {
            "zuc128" => {
                zuc_mb::eea3(&array(&vector.key), &array(&vector.iv), &zeros, &mut out).unwrap();
            }
            "zuc256" => {
                zuc_mb::eea3_256(&array(&vector.key), &array(&vector.iv), &zeros, &mut out)
                    .unwrap();
            }
            other => panic!("unknown variant {other}"),
        }
        assert_eq!(hex::encode(&out), vector.keystream, "Vector Mismatched: {}", vector.name);
    }
}

#[test]
fn test_eea3_vectors() {
    for vector in load().eea3 {
        let key: [u8; 16] = array(&vector.key);
        let iv = iv::eea3_iv(vector.count, vector.bearer, vector.direction);
        let plain = hex::decode(&vector.plaintext).unwrap();

        let mut single = vec![0u8; plain.len()];
        zuc_mb::eea3(&key, &iv, &plain, &mut single).unwrap();
        assert_eq!(hex::encode(&single), vector.ciphertext, "Vector Mismatched: {}", vector.name);

        // Same vector in all 8 lanes of a batch
        let mut outputs = vec![vec![0u8; plain.len()]; 8];
        let mut jobs: Vec<_> =
            outputs.iter_mut().map(|out| CipherJob::new(&key, &iv, &plain, out)).collect();
        zuc_mb::eea3_n(&mut jobs).unwrap();
        for out in &outputs {
            assert_eq!(out, &single, "Batch Mismatched: {}", vector.name);
        }

        zuc_mb::eea3_in_place(&key, &iv, &mut single).unwrap();
        assert_eq!(single, plain);
    }
}

#[test]
fn test_eia3_vectors() {
    for vector in load().eia3 {
        let key: [u8; 16] = array(&vector.key);
        let iv = iv::eia3_iv(vector.count, vector.bearer, vector.direction);
        let message = hex::decode(&vector.message).unwrap();
        let expected = u32::from_str_radix(&vector.mac, 16).unwrap();

        let mac = zuc_mb::eia3(&key, &iv, &message, vector.length_bits).unwrap();
        assert_eq!(mac, expected, "Vector Mismatched: {}", vector.name);
        assert!(zuc_mb::verify_eia3(&key, &iv, &message, vector.length_bits, expected));

        let jobs = [AuthJob::new(&key, &iv, &message, vector.length_bits); 9];
        let mut tags = [0u32; 9];
        zuc_mb::eia3_n(&jobs, &mut tags).unwrap();
        assert!(tags.iter().all(|&tag| tag == expected), "Batch Mismatched: {}", vector.name);
    }
}

#[test]
fn test_zuc256_mac_vectors() {
    for vector in load().zuc256_mac {
        let key: [u8; 32] = array(&vector.key);
        let iv: [u8; 25] = array(&vector.iv);
        let message = vec![vector.fill; (vector.length_bits as usize).div_ceil(8)];
        let expected = hex::decode(&vector.tag).unwrap();
        let tag_size = TagSize::try_from(expected.len()).unwrap();

        let tag = zuc_mb::eia3_256(&key, &iv, &message, vector.length_bits, tag_size).unwrap();
        assert_eq!(hex::encode(tag), vector.tag, "Vector Mismatched: {}", vector.name);
        assert!(zuc_mb::verify_eia3_256(&key, &iv, &message, vector.length_bits, &expected));

        let jobs = [Auth256Job::new(&key, &iv, &message, vector.length_bits); 8];
        let mut tags = [zuc_mb::MacTag::empty(); 8];
        zuc_mb::eia3_256_n(&jobs, tag_size, &mut tags).unwrap();
        assert!(tags.iter().all(|t| t.as_bytes() == expected), "Batch Mismatched: {}", vector.name);
    }
}
