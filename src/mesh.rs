//! # Mesh Module
//!
//! Reads the scene's mesh from Wavefront OBJ text and uploads it to the GPU.
//!
//! ## Reading
//!
//! [`parse_obj`] understands the subset of OBJ a static mesh needs:
//!
//! - `v`, `vt`, `vn`: positions, texture coordinates and normals. Extra components (the
//!   optional `w`) are ignored.
//! - `f`: a polygon of three or more vertex references (`v`, `v/vt`, `v//vn` or `v/vt/vn`),
//!   fan-triangulated into a triangle list.
//! - `l`: a polyline of two or more references, split into a line list.
//! - `o`: starts a new mesh. `g` and `usemtl` start a new submesh within the current mesh.
//!
//! Everything else (`mtllib`, `s`, comments) is skipped. References are 1-based; negative
//! references count back from the most recently declared attribute.
//!
//! Each mesh gets its own vertex list, de-duplicated on the full reference triple. Vertices the
//! file gives no normal are assigned the normalized, area-weighted sum of the faces around them.
//!
//! ## Uploading
//!
//! [`MeshData::upload`] creates one vertex buffer per mesh and one index buffer per submesh.
//! Meshes small enough use 16-bit indices.

use std::collections::HashMap;

use nalgebra_glm::Vec3;
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, i64 as signed_index, space0, space1},
    combinator::{eof, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::config::MeshSource;
use crate::error::{SetupError, SetupResult};
use crate::vertex::Vertex;

/// A submesh: a run of indices into its mesh's vertex list sharing one primitive topology.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmeshData {
    /// The `g` or `usemtl` name the submesh was declared under. Empty before the first one.
    pub name: String,
    pub topology: wgpu::PrimitiveTopology,
    pub indices: Vec<u32>,
}

/// A mesh read from an OBJ asset: one interleaved vertex list and the submeshes drawing it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// The `o` name, empty for geometry declared before any `o` statement.
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub submeshes: Vec<SubmeshData>,
}

/// The draw parameters of an uploaded submesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmeshLayout {
    pub topology: wgpu::PrimitiveTopology,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
}

/// A submesh living on the GPU.
pub struct GpuSubmesh {
    pub index_buffer: wgpu::Buffer,
    pub layout: SubmeshLayout,
}

/// A mesh living on the GPU.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub submeshes: Vec<GpuSubmesh>,
}

/// Totals over a set of meshes, for logging and the inspector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub meshes: usize,
    pub submeshes: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub lines: usize,
}

impl MeshStats {
    pub fn from_meshes(meshes: &[MeshData]) -> Self {
        let mut stats = Self {
            meshes: meshes.len(),
            ..Self::default()
        };
        for mesh in meshes {
            stats.vertices += mesh.vertices.len();
            stats.submeshes += mesh.submeshes.len();
            for submesh in &mesh.submeshes {
                match submesh.topology {
                    wgpu::PrimitiveTopology::LineList => stats.lines += submesh.indices.len() / 2,
                    _ => stats.triangles += submesh.indices.len() / 3,
                }
            }
        }
        stats
    }
}

impl MeshData {
    /// The index format the mesh is uploaded with.
    pub fn index_format(&self) -> wgpu::IndexFormat {
        if self.vertices.len() <= u16::MAX as usize {
            wgpu::IndexFormat::Uint16
        } else {
            wgpu::IndexFormat::Uint32
        }
    }

    /// Creates the vertex buffer and one index buffer per submesh.
    pub fn upload(&self, device: &wgpu::Device) -> GpuMesh {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_format = self.index_format();
        let submeshes = self
            .submeshes
            .iter()
            .map(|submesh| {
                // `create_buffer_init` pads to the copy alignment, so odd u16 counts are fine.
                let index_buffer = match index_format {
                    wgpu::IndexFormat::Uint16 => {
                        let narrowed: Vec<u16> =
                            submesh.indices.iter().map(|&index| index as u16).collect();
                        create_index_buffer(device, bytemuck::cast_slice(&narrowed))
                    }
                    wgpu::IndexFormat::Uint32 => {
                        create_index_buffer(device, bytemuck::cast_slice(&submesh.indices))
                    }
                };

                GpuSubmesh {
                    index_buffer,
                    layout: SubmeshLayout {
                        topology: submesh.topology,
                        index_format,
                        index_count: submesh.indices.len() as u32,
                    },
                }
            })
            .collect();

        GpuMesh {
            vertex_buffer,
            submeshes,
        }
    }
}

fn create_index_buffer(device: &wgpu::Device, contents: &[u8]) -> wgpu::Buffer {
    wgpu::util::DeviceExt::create_buffer_init(
        device,
        &wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents,
            usage: wgpu::BufferUsages::INDEX,
        },
    )
}

/// Reads the meshes named by `source`.
///
/// Fails if the file cannot be read, is malformed, or contains nothing drawable.
pub fn load(source: &MeshSource) -> SetupResult<Vec<MeshData>> {
    match source {
        MeshSource::Embedded(text) => parse_obj(text),
        MeshSource::Path(path) => {
            log::info!("Loading mesh asset from {}", path.display());
            let text = std::fs::read_to_string(path).map_err(|source| SetupError::AssetIo {
                path: path.clone(),
                source,
            })?;
            parse_obj(&text)
        }
    }
}

/// Parses OBJ text into meshes, in declaration order.
pub fn parse_obj(text: &str) -> SetupResult<Vec<MeshData>> {
    let mut reader = ObjReader::default();

    for (number, raw) in text.lines().enumerate() {
        let line_number = number + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let (_, parsed) = statement(line).map_err(|_| {
            SetupError::asset_parse(line_number, format!("cannot parse statement '{line}'"))
        })?;
        reader.apply(parsed, line_number)?;
    }

    let meshes = reader.finish();
    if meshes.is_empty() {
        return Err(SetupError::EmptyAsset);
    }
    Ok(meshes)
}

/// A vertex reference from an `f` or `l` statement, still in file numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VertexRef {
    position: i64,
    tex_coords: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Statement<'a> {
    Position([f32; 3]),
    TexCoords([f32; 2]),
    Normal([f32; 3]),
    Face(Vec<VertexRef>),
    Polyline(Vec<VertexRef>),
    Object(&'a str),
    Group(&'a str),
    Ignored,
}

fn statement(line: &str) -> IResult<&str, Statement<'_>> {
    let (rest, keyword) = take_till1(char::is_whitespace)(line)?;
    let (rest, _) = space0(rest)?;

    match keyword {
        "v" => {
            let (rest, position) =
                terminated(float3, pair(opt(preceded(space1, float)), line_end))(rest)?;
            Ok((rest, Statement::Position(position)))
        }
        "vt" => {
            let (rest, (u, v, _)) = terminated(
                tuple((
                    float,
                    opt(preceded(space1, float)),
                    opt(preceded(space1, float)),
                )),
                line_end,
            )(rest)?;
            Ok((rest, Statement::TexCoords([u, v.unwrap_or(0.0)])))
        }
        "vn" => {
            let (rest, normal) = terminated(float3, line_end)(rest)?;
            Ok((rest, Statement::Normal(normal)))
        }
        "f" => {
            let (rest, refs) = vertex_refs(rest)?;
            Ok((rest, Statement::Face(refs)))
        }
        "l" => {
            let (rest, refs) = vertex_refs(rest)?;
            Ok((rest, Statement::Polyline(refs)))
        }
        "o" => Ok(("", Statement::Object(rest))),
        "g" | "usemtl" => Ok(("", Statement::Group(rest))),
        _ => Ok(("", Statement::Ignored)),
    }
}

fn float3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, (x, _, y, _, z)) = tuple((float, space1, float, space1, float))(input)?;
    Ok((input, [x, y, z]))
}

fn vertex_refs(input: &str) -> IResult<&str, Vec<VertexRef>> {
    terminated(separated_list1(space1, vertex_ref), line_end)(input)
}

/// Trailing blanks, then nothing.
fn line_end(input: &str) -> IResult<&str, (&str, &str)> {
    pair(space0, eof)(input)
}

fn vertex_ref(input: &str) -> IResult<&str, VertexRef> {
    let (input, position) = signed_index(input)?;
    let (input, tex_coords) = opt(preceded(char('/'), opt(signed_index)))(input)?;
    let (input, normal) = match tex_coords {
        Some(_) => opt(preceded(char('/'), signed_index))(input)?,
        None => (input, None),
    };

    Ok((
        input,
        VertexRef {
            position,
            tex_coords: tex_coords.flatten(),
            normal,
        },
    ))
}

/// Resolves a 1-based or negative OBJ reference against `len` declared attributes.
fn resolve(index: i64, len: usize, kind: &str, line: usize) -> SetupResult<usize> {
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => len as i64 + i,
        _ => -1,
    };

    if resolved < 0 || resolved >= len as i64 {
        return Err(SetupError::asset_parse(
            line,
            format!("{kind} reference {index} is out of range ({len} declared)"),
        ));
    }
    Ok(resolved as usize)
}

#[derive(Default)]
struct ObjReader {
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    meshes: Vec<MeshData>,
    current: MeshBuilder,
}

impl ObjReader {
    fn apply(&mut self, statement: Statement<'_>, line: usize) -> SetupResult<()> {
        match statement {
            Statement::Position(position) => self.positions.push(position),
            Statement::TexCoords(tex_coords) => self.tex_coords.push(tex_coords),
            Statement::Normal(normal) => self.normals.push(normal),
            Statement::Face(refs) => {
                if refs.len() < 3 {
                    return Err(SetupError::asset_parse(
                        line,
                        "face needs at least three vertices",
                    ));
                }
                let corners = self.emit_all(&refs, line)?;
                let indices = self
                    .current
                    .open_submesh(wgpu::PrimitiveTopology::TriangleList);
                for i in 1..corners.len() - 1 {
                    indices.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                }
            }
            Statement::Polyline(refs) => {
                if refs.len() < 2 {
                    return Err(SetupError::asset_parse(
                        line,
                        "line needs at least two vertices",
                    ));
                }
                let points = self.emit_all(&refs, line)?;
                let indices = self.current.open_submesh(wgpu::PrimitiveTopology::LineList);
                for segment in points.windows(2) {
                    indices.extend_from_slice(segment);
                }
            }
            Statement::Object(name) => {
                let finished = std::mem::replace(&mut self.current, MeshBuilder::named(name));
                self.meshes.extend(finished.build());
            }
            Statement::Group(name) => self.current.start_group(name),
            Statement::Ignored => {}
        }
        Ok(())
    }

    fn emit_all(&mut self, refs: &[VertexRef], line: usize) -> SetupResult<Vec<u32>> {
        refs.iter().map(|r| self.emit(r, line)).collect()
    }

    fn emit(&mut self, vertex_ref: &VertexRef, line: usize) -> SetupResult<u32> {
        let position = resolve(vertex_ref.position, self.positions.len(), "position", line)?;
        let tex_coords = vertex_ref
            .tex_coords
            .map(|i| resolve(i, self.tex_coords.len(), "texture coordinate", line))
            .transpose()?;
        let normal = vertex_ref
            .normal
            .map(|i| resolve(i, self.normals.len(), "normal", line))
            .transpose()?;

        let key = (position, tex_coords, normal);
        if let Some(&index) = self.current.lookup.get(&key) {
            return Ok(index);
        }

        let index = self.current.vertices.len() as u32;
        self.current.vertices.push(Vertex {
            position: self.positions[position],
            normal: normal.map_or([0.0; 3], |n| self.normals[n]),
            tex_coords: tex_coords.map_or([0.0; 2], |t| self.tex_coords[t]),
        });
        self.current.missing_normal.push(normal.is_none());
        self.current.lookup.insert(key, index);
        Ok(index)
    }

    fn finish(mut self) -> Vec<MeshData> {
        let last = std::mem::take(&mut self.current);
        self.meshes.extend(last.build());
        self.meshes
    }
}

type VertexKey = (usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct MeshBuilder {
    name: String,
    group: String,
    vertices: Vec<Vertex>,
    missing_normal: Vec<bool>,
    lookup: HashMap<VertexKey, u32>,
    submeshes: Vec<SubmeshData>,
    open_triangles: Option<usize>,
    open_lines: Option<usize>,
}

impl MeshBuilder {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    fn start_group(&mut self, name: &str) {
        self.group = name.to_owned();
        self.open_triangles = None;
        self.open_lines = None;
    }

    /// The index list new primitives of `topology` go into, creating it on first use in the
    /// current group.
    fn open_submesh(&mut self, topology: wgpu::PrimitiveTopology) -> &mut Vec<u32> {
        let slot = match topology {
            wgpu::PrimitiveTopology::LineList => &mut self.open_lines,
            _ => &mut self.open_triangles,
        };
        let position = *slot.get_or_insert_with(|| {
            self.submeshes.push(SubmeshData {
                name: self.group.clone(),
                topology,
                indices: Vec::new(),
            });
            self.submeshes.len() - 1
        });
        &mut self.submeshes[position].indices
    }

    fn build(mut self) -> Option<MeshData> {
        self.submeshes.retain(|submesh| !submesh.indices.is_empty());
        if self.submeshes.is_empty() {
            return None;
        }
        self.fill_missing_normals();

        Some(MeshData {
            name: self.name,
            vertices: self.vertices,
            submeshes: self.submeshes,
        })
    }

    fn fill_missing_normals(&mut self) {
        if !self.missing_normal.contains(&true) {
            return;
        }

        let mut sums = vec![Vec3::zeros(); self.vertices.len()];
        let triangle_lists = self
            .submeshes
            .iter()
            .filter(|submesh| submesh.topology == wgpu::PrimitiveTopology::TriangleList);
        for submesh in triangle_lists {
            for triangle in submesh.indices.chunks_exact(3) {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
                let pa = Vec3::from(self.vertices[a].position);
                let pb = Vec3::from(self.vertices[b].position);
                let pc = Vec3::from(self.vertices[c].position);
                // Unnormalized, so larger faces weigh more.
                let face = nalgebra_glm::cross(&(pb - pa), &(pc - pa));
                for index in [a, b, c] {
                    sums[index] += face;
                }
            }
        }

        for ((vertex, missing), sum) in self
            .vertices
            .iter_mut()
            .zip(&self.missing_normal)
            .zip(sums)
        {
            if *missing && sum.norm_squared() > 0.0 {
                vertex.normal = sum.normalize().into();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_mesh(text: &str) -> MeshData {
        let mut meshes = parse_obj(text).expect("valid obj");
        assert_eq!(meshes.len(), 1);
        meshes.remove(0)
    }

    #[test]
    fn parses_vertex_reference_forms() {
        let refs = |line| match statement(line) {
            Ok((_, Statement::Face(refs))) => refs,
            other => panic!("unexpected {other:?}"),
        };

        assert_eq!(
            refs("f 1 2/3 4//5 -1/-2/-3"),
            vec![
                VertexRef { position: 1, tex_coords: None, normal: None },
                VertexRef { position: 2, tex_coords: Some(3), normal: None },
                VertexRef { position: 4, tex_coords: None, normal: Some(5) },
                VertexRef { position: -1, tex_coords: Some(-2), normal: Some(-3) },
            ]
        );
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = single_mesh(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n",
        );

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.submeshes.len(), 1);
        assert_eq!(mesh.submeshes[0].topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(mesh.submeshes[0].indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn shared_references_are_deduplicated() {
        let mesh = single_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 3 2 4\n");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.submeshes[0].indices, vec![0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn distinct_normals_split_vertices() {
        let mesh = single_mesh(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 -1\nf 1//1 2//1 3//1\nf 1//2 3//2 2//2\n",
        );
        assert_eq!(mesh.vertices.len(), 6);
    }

    #[test]
    fn negative_references_count_back() {
        let mesh = single_mesh("v 5 0 0\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n");
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn missing_normals_are_synthesized_from_faces() {
        let mesh = single_mesh("v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n");
        for vertex in &mesh.vertices {
            let n = Vec3::from(vertex.normal);
            assert!((n - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn texture_coordinates_default_to_zero() {
        let mesh = single_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25 0.75\nf 1/1 2 3\n");
        assert_eq!(mesh.vertices[0].tex_coords, [0.25, 0.75]);
        assert_eq!(mesh.vertices[1].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn groups_and_objects_split_geometry() {
        let meshes = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             o first\ng a\nf 1 2 3\nusemtl b\nf 1 2 3\nl 1 2 3\n\
             o second\nf 3 2 1\n",
        )
        .expect("valid obj");

        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0].name, "first");
        let names: Vec<_> = meshes[0]
            .submeshes
            .iter()
            .map(|s| (s.name.as_str(), s.topology))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a", wgpu::PrimitiveTopology::TriangleList),
                ("b", wgpu::PrimitiveTopology::TriangleList),
                ("b", wgpu::PrimitiveTopology::LineList),
            ]
        );
        assert_eq!(meshes[0].submeshes[2].indices, vec![0, 1, 1, 2]);

        // Vertices are local to each object.
        assert_eq!(meshes[1].name, "second");
        assert_eq!(meshes[1].vertices.len(), 3);
        assert_eq!(meshes[1].submeshes[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_groups_and_objects_are_dropped() {
        let meshes = parse_obj("o unused\ng nothing\no used\nv 0 0 0\nv 1 0 0\nv 0 1 0\ng\nf 1 2 3\n")
            .expect("valid obj");
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name, "used");
        assert_eq!(meshes[0].submeshes.len(), 1);
    }

    #[test]
    fn comments_and_unknown_statements_are_skipped() {
        let mesh = single_mesh(
            "# header\nmtllib scene.mtl\nv 0 0 0 1.0\nv 1 0 0\nv 0 1 0 # trailing\ns off\nf 1 2 3\n",
        );
        assert_eq!(mesh.vertices.len(), 3);
    }

    #[test]
    fn malformed_input_reports_line() {
        match parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n") {
            Err(SetupError::AssetParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {other:?}"),
        }
        match parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n") {
            Err(SetupError::AssetParse { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("out of range"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match parse_obj("v 0 zero 0\n") {
            Err(SetupError::AssetParse { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n"),
            Err(SetupError::AssetParse { .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3 x\n"),
            Err(SetupError::AssetParse { .. })
        ));
    }

    #[test]
    fn trailing_garbage_on_attributes_is_rejected() {
        let cases = [
            ("v 0 0 0junk\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", 1),
            ("v 0 0 0\nv 1 0 0 1 2\nv 0 1 0\nf 1 2 3\n", 2),
            ("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1 zz\nf 1//1 2//1 3//1\n", 4),
            ("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5 0 0\nf 1/1 2/1 3/1\n", 4),
            ("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5x\nf 1/1 2/1 3/1\n", 4),
        ];
        for (text, expected_line) in cases {
            match parse_obj(text) {
                Err(SetupError::AssetParse { line, .. }) => assert_eq!(line, expected_line, "{text:?}"),
                other => panic!("unexpected {other:?} for {text:?}"),
            }
        }
    }

    #[test]
    fn optional_attribute_components_are_accepted() {
        let meshes = parse_obj("v 0 0 0 1\nv 1 0 0 1\nv 0 1 0 1\nvt 0.25\nvt 0.5 0.5 0\nvn 0 0 1  \nf 1/1/1 2/2/1 3/2/1\n")
            .expect("valid obj");
        assert_eq!(meshes[0].vertices.len(), 3);
        assert_eq!(meshes[0].vertices[0].tex_coords, [0.25, 0.0]);
        assert_eq!(meshes[0].vertices[1].tex_coords, [0.5, 0.5]);
    }

    #[test]
    fn geometry_free_asset_is_empty() {
        assert!(matches!(parse_obj("v 0 0 0\n"), Err(SetupError::EmptyAsset)));
        assert!(matches!(parse_obj(""), Err(SetupError::EmptyAsset)));
    }

    #[test]
    fn missing_file_reports_path() {
        let source = MeshSource::Path("does/not/exist.obj".into());
        match load(&source) {
            Err(SetupError::AssetIo { path, .. }) => {
                assert_eq!(path, std::path::PathBuf::from("does/not/exist.obj"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bundled_container_loads() {
        let meshes = load(&MeshSource::Embedded(crate::config::DEFAULT_MESH)).expect("bundled obj");
        let stats = MeshStats::from_meshes(&meshes);

        assert_eq!(stats.meshes, 1);
        assert_eq!(stats.submeshes, 2);
        assert_eq!(stats.triangles, 12);
        assert_eq!(stats.vertices, 24);
        assert_eq!(meshes[0].index_format(), wgpu::IndexFormat::Uint16);
    }

    #[test]
    fn large_meshes_switch_to_wide_indices() {
        let mesh = MeshData {
            name: String::new(),
            vertices: vec![Vertex::default(); u16::MAX as usize],
            submeshes: Vec::new(),
        };
        assert_eq!(mesh.index_format(), wgpu::IndexFormat::Uint16);

        // Index 0xFFFF is the primitive restart value on WebGL2, so it is never handed out.
        let mesh = MeshData {
            vertices: vec![Vertex::default(); u16::MAX as usize + 1],
            ..mesh
        };
        assert_eq!(mesh.index_format(), wgpu::IndexFormat::Uint32);
    }
}
