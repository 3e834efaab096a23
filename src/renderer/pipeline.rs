//! WebGPU render pipeline and the scene graph it draws

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use super::shapes::{self, PipeDims};
use super::vertex::{Vertex, colors};
use super::{Axis, BirdVisual, Handle, PairVisual, Scene};
use crate::Tuning;
use crate::sim::BirdKind;

/// What a node draws
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Body { radius: f32, color: [f32; 4] },
    Wing { radius: f32 },
    Pipe { upper: bool },
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    shape: Shape,
    parent: Option<Handle>,
    /// Position relative to the parent (or world position for roots)
    offset: Vec3,
    /// Euler angles in radians; the flat projection only shows z
    rotation: Vec3,
    in_scene: bool,
}

impl Node {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            parent: None,
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            in_scene: false,
        }
    }
}

/// Parent/child graph of drawable nodes, independent of the GPU
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: BTreeMap<Handle, Node>,
    next_handle: u32,
    camera_z: f32,
    fov_y_degrees: f32,
    pipe: PipeDims,
    bird_radius: f32,
}

impl SceneGraph {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_handle: 1,
            camera_z: tuning.camera_z,
            fov_y_degrees: tuning.fov_y_degrees,
            pipe: PipeDims::from(tuning),
            bird_radius: tuning.player_radius,
        }
    }

    fn insert(&mut self, node: Node) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(handle, node);
        handle
    }

    /// Number of live nodes (children included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.nodes.contains_key(&handle)
    }

    fn world_position(&self, handle: Handle) -> Option<Vec3> {
        let node = self.nodes.get(&handle)?;
        match node.parent {
            Some(parent) => Some(self.world_position(parent)? + node.offset),
            None => Some(node.offset),
        }
    }

    fn is_visible(&self, node: &Node) -> bool {
        match node.parent {
            Some(parent) => self.nodes.get(&parent).is_some_and(|p| self.is_visible(p)),
            None => node.in_scene,
        }
    }

    /// Triangles for every visible node in normalized device coordinates
    ///
    /// Nodes are drawn in creation order, children (wings) before their
    /// parent so the body covers the wing roots.
    pub fn tessellate(&self, aspect: f32) -> Vec<Vertex> {
        let mut vertices = Vec::new();

        for (&handle, node) in &self.nodes {
            if node.parent.is_some() || !self.is_visible(node) {
                continue;
            }
            for (&child, child_node) in &self.nodes {
                if child_node.parent == Some(handle) {
                    self.tessellate_node(child, child_node, aspect, &mut vertices);
                }
            }
            self.tessellate_node(handle, node, aspect, &mut vertices);
        }

        vertices
    }

    fn tessellate_node(&self, handle: Handle, node: &Node, aspect: f32, out: &mut Vec<Vertex>) {
        let Some(pos) = self.world_position(handle) else {
            return;
        };
        let center = pos.truncate();
        let local = match node.shape {
            Shape::Body { radius, color } => shapes::bird_body(center, radius, color),
            Shape::Wing { radius } => shapes::wing(center, radius, node.rotation.z),
            Shape::Pipe { upper } => shapes::pipe(center, &self.pipe, upper),
        };

        let half_h = self.visible_half_height(self.camera_z - pos.z);
        if half_h <= 0.0 {
            return;
        }
        let scale = Vec2::new(1.0 / (half_h * aspect), 1.0 / half_h);
        out.extend(local.into_iter().map(|v| {
            let p = Vec2::from(v.position) * scale;
            Vertex::new(p.x, p.y, v.color)
        }));
    }
}

impl Scene for SceneGraph {
    type Error = std::convert::Infallible;

    fn create_player_visual(&mut self, kind: BirdKind) -> BirdVisual {
        let color = match kind {
            BirdKind::Local => colors::BIRD_BODY,
            BirdKind::Decorative => colors::DECORATIVE_BODY,
        };
        let radius = self.bird_radius;
        let body = self.insert(Node::new(Shape::Body { radius, color }));

        let mut wing = |side: f32| {
            let mut node = Node::new(Shape::Wing { radius });
            node.parent = Some(body);
            node.offset = shapes::wing_offset(radius, side).extend(0.0);
            self.insert(node)
        };
        let left_wing = wing(-1.0);
        let right_wing = wing(1.0);

        BirdVisual {
            body,
            left_wing,
            right_wing,
        }
    }

    fn create_obstacle_pair_visual(&mut self) -> PairVisual {
        PairVisual {
            upper: self.insert(Node::new(Shape::Pipe { upper: true })),
            lower: self.insert(Node::new(Shape::Pipe { upper: false })),
        }
    }

    fn set_position(&mut self, handle: Handle, pos: Vec3) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.offset = pos;
        }
    }

    fn set_rotation(&mut self, handle: Handle, axis: Axis, angle: f32) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            match axis {
                Axis::X => node.rotation.x = angle,
                Axis::Y => node.rotation.y = angle,
                Axis::Z => node.rotation.z = angle,
            }
        }
    }

    fn add_to_scene(&mut self, handle: Handle) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.in_scene = true;
        }
    }

    fn remove_from_scene(&mut self, handle: Handle) {
        self.nodes.remove(&handle);
        self.nodes.retain(|_, node| node.parent != Some(handle));
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visible_half_height(&self, depth: f32) -> f32 {
        crate::visible_half_height(self.fov_y_degrees, depth)
    }
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    pub graph: SceneGraph,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        tuning: &Tuning,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flappy3d-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, colors::SKY)]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width.max(1), height.max(1)),
            graph: SceneGraph::new(tuning),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1 as f32
    }
}

impl Scene for RenderState {
    type Error = wgpu::SurfaceError;

    fn create_player_visual(&mut self, kind: BirdKind) -> BirdVisual {
        self.graph.create_player_visual(kind)
    }

    fn create_obstacle_pair_visual(&mut self) -> PairVisual {
        self.graph.create_obstacle_pair_visual()
    }

    fn set_position(&mut self, handle: Handle, pos: Vec3) {
        self.graph.set_position(handle, pos);
    }

    fn set_rotation(&mut self, handle: Handle, axis: Axis, angle: f32) {
        self.graph.set_rotation(handle, axis, angle);
    }

    fn add_to_scene(&mut self, handle: Handle) {
        self.graph.add_to_scene(handle);
    }

    fn remove_from_scene(&mut self, handle: Handle) {
        self.graph.remove_from_scene(handle);
    }

    /// Tessellate the graph, upload and draw one frame
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let vertices = self.graph.tessellate(self.aspect());

        if !vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::SKY.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn visible_half_height(&self, depth: f32) -> f32 {
        self.graph.visible_half_height(depth)
    }
}
