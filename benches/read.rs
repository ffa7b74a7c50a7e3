//! Measures PLY read (parse) speed for all three encodings.

use std::io::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use criterion::{
    criterion_group, criterion_main, black_box, BenchmarkId, Criterion, Throughput,
};

use plydata::{Encoding, PlyData, Reader};


// ===============================================================================================
// ===== Helper utilities
// ===============================================================================================

/// Number of vertices per side of the generated grid mesh.
const GRID_SIZE: u32 = 200;

fn grid_header(encoding: Encoding) -> Vec<u8> {
    let vertex_count = GRID_SIZE * GRID_SIZE;
    let face_count = 2 * (GRID_SIZE - 1) * (GRID_SIZE - 1);

    let mut out = Vec::<u8>::new();
    write!(
        out,
        "ply\n\
        format {} 1.0\n\
        comment generated grid\n\
        element vertex {}\n\
        property float x\n\
        property float y\n\
        property float z\n\
        property uchar red\n\
        element face {}\n\
        property list uchar int vertex_indices\n\
        end_header\n",
        encoding,
        vertex_count,
        face_count,
    ).unwrap();

    out
}

/// Calls `f` with the three vertex indices of every triangle of the grid.
fn for_each_triangle(mut f: impl FnMut([u32; 3])) {
    for y in 0..GRID_SIZE - 1 {
        for x in 0..GRID_SIZE - 1 {
            let i = y * GRID_SIZE + x;
            f([i, i + 1, i + GRID_SIZE]);
            f([i + 1, i + GRID_SIZE + 1, i + GRID_SIZE]);
        }
    }
}

fn grid_binary<B: ByteOrder>(encoding: Encoding) -> Vec<u8> {
    let mut out = grid_header(encoding);
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            out.write_f32::<B>(x as f32 * 0.1).unwrap();
            out.write_f32::<B>(y as f32 * 0.1).unwrap();
            out.write_f32::<B>(((x * y) % 7) as f32).unwrap();
            out.write_u8((x % 256) as u8).unwrap();
        }
    }

    for_each_triangle(|[a, b, c]| {
        out.write_u8(3).unwrap();
        out.write_i32::<B>(a as i32).unwrap();
        out.write_i32::<B>(b as i32).unwrap();
        out.write_i32::<B>(c as i32).unwrap();
    });

    out
}

fn grid_ascii() -> Vec<u8> {
    let mut out = grid_header(Encoding::Ascii);
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            writeln!(
                out,
                "{} {} {} {}",
                x as f32 * 0.1,
                y as f32 * 0.1,
                ((x * y) % 7) as f32,
                x % 256,
            ).unwrap();
        }
    }

    for_each_triangle(|[a, b, c]| {
        writeln!(out, "3 {} {} {}", a, b, c).unwrap();
    });

    out
}

fn all_files() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("ble", grid_binary::<LittleEndian>(Encoding::BinaryLittleEndian)),
        ("bbe", grid_binary::<BigEndian>(Encoding::BinaryBigEndian)),
        ("ascii", grid_ascii()),
    ]
}


// ===============================================================================================
// ===== Benchmarks
// ===============================================================================================

/// Measures reading the whole file into `PlyData`.
fn grid_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("ply_grid_full");

    for (name, data) in all_files() {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| PlyData::from_bytes(black_box(data)).unwrap())
        });
    }

    group.finish();
}

/// Measures header parsing only.
fn grid_header_only(c: &mut Criterion) {
    let data = grid_ascii();
    c.bench_function("ply_grid_header", |b| {
        b.iter(|| Reader::new(black_box(&data[..])).unwrap().header().elements().len())
    });
}

/// Measures reading plus converting positions and faces.
fn grid_positions_and_faces(c: &mut Criterion) {
    let mut group = c.benchmark_group("ply_grid_positions_and_faces");

    for (name, data) in all_files() {
        let ply = PlyData::from_bytes(&data).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &ply, |b, ply| {
            b.iter(|| {
                let positions = ply.vertex_positions().unwrap();
                let faces = ply.face_indices::<u32>().unwrap();
                (positions, faces)
            })
        });
    }

    group.finish();
}


criterion_group!(benches, grid_full, grid_header_only, grid_positions_and_faces);
criterion_main!(benches);
