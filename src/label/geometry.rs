//! Label geometry
//!
//! All coordinates are canvas design units with the y axis pointing down.
//! A [`Frame`] stores the unrotated top-left corner and size; `rotation` is
//! clockwise degrees about the frame centre.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 8.0;

/// Smallest width/height a resize may produce
pub const MIN_ELEMENT_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rotate a vector clockwise (screen orientation) by `degrees`
pub fn rotate_vector(v: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate `p` about `center` by `degrees`
pub fn rotate_point(p: Point, center: Point, degrees: f64) -> Point {
    center + rotate_vector(p - center, degrees)
}

/// Wrap an angle into `[0, 360)`; non-finite input becomes 0
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Axis-aligned rectangle given by its extremes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Position, size and rotation of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
            rotation: 0.0,
        }
    }
}

impl Frame {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Map a point given relative to the centre in the element's own axes
    /// into canvas space
    pub fn local_to_canvas(&self, local: Point) -> Point {
        self.center() + rotate_vector(local, self.rotation)
    }

    /// Inverse of [`Frame::local_to_canvas`]
    pub fn canvas_to_local(&self, p: Point) -> Point {
        rotate_vector(p - self.center(), -self.rotation)
    }

    /// Corners in canvas space: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point; 4] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            self.local_to_canvas(Point::new(-hw, -hh)),
            self.local_to_canvas(Point::new(hw, -hh)),
            self.local_to_canvas(Point::new(hw, hh)),
            self.local_to_canvas(Point::new(-hw, hh)),
        ]
    }

    /// Axis-aligned box enclosing the rotated frame
    pub fn bounding_box(&self) -> Bounds {
        let corners = self.corners();
        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for c in corners {
            bounds.min_x = bounds.min_x.min(c.x);
            bounds.min_y = bounds.min_y.min(c.y);
            bounds.max_x = bounds.max_x.max(c.x);
            bounds.max_y = bounds.max_y.max(c.y);
        }
        bounds
    }

    pub fn contains(&self, p: Point) -> bool {
        let local = self.canvas_to_local(p);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Frame {
        Frame {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Move by `(dx, dy)` but keep the rotated bounding box inside a canvas
    /// of the given size. A box larger than the canvas is pinned to the
    /// top/left edge.
    pub fn translated_within(&self, dx: f64, dy: f64, canvas_width: f64, canvas_height: f64) -> Frame {
        let moved = self.translated(dx, dy);
        let bounds = moved.bounding_box();
        let shift_x = fit_shift(bounds.min_x, bounds.max_x, canvas_width);
        let shift_y = fit_shift(bounds.min_y, bounds.max_y, canvas_height);
        moved.translated(shift_x, shift_y)
    }

    /// Rotate so the top edge faces `pointer`, optionally snapping to `snap` degrees
    pub fn rotated_towards(&self, pointer: Point, snap: Option<f64>) -> Frame {
        Frame {
            rotation: rotation_to_pointer(self.center(), pointer, snap),
            ..*self
        }
    }
}

fn fit_shift(min: f64, max: f64, limit: f64) -> f64 {
    if max - min >= limit || min < 0.0 {
        -min
    } else if max > limit {
        limit - max
    } else {
        0.0
    }
}

/// Angle of `pointer` around `center`; straight up is 0, clockwise positive
pub fn rotation_to_pointer(center: Point, pointer: Point, snap: Option<f64>) -> f64 {
    let d = pointer - center;
    let angle = normalize_rotation(d.x.atan2(-d.y).to_degrees());
    match snap {
        Some(step) if step.is_finite() && step > 0.0 => {
            normalize_rotation((angle / step).round() * step)
        }
        _ => angle,
    }
}

/// One of the eight resize grips around an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::Ne,
        ResizeHandle::Nw,
        ResizeHandle::Se,
        ResizeHandle::Sw,
    ];

    /// Which edges move: -1 for left/top, 1 for right/bottom, 0 for none
    fn direction(self) -> (f64, f64) {
        match self {
            ResizeHandle::N => (0.0, -1.0),
            ResizeHandle::S => (0.0, 1.0),
            ResizeHandle::E => (1.0, 0.0),
            ResizeHandle::W => (-1.0, 0.0),
            ResizeHandle::Ne => (1.0, -1.0),
            ResizeHandle::Nw => (-1.0, -1.0),
            ResizeHandle::Se => (1.0, 1.0),
            ResizeHandle::Sw => (-1.0, 1.0),
        }
    }

    pub fn is_corner(self) -> bool {
        let (dx, dy) = self.direction();
        dx != 0.0 && dy != 0.0
    }

    /// The point that stays put while this handle is dragged, in canvas space
    pub fn anchor(self, frame: &Frame) -> Point {
        let (dx, dy) = self.direction();
        frame.local_to_canvas(Point::new(-dx * frame.width / 2.0, -dy * frame.height / 2.0))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResizeOptions {
    pub min_size: f64,
    pub keep_aspect: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            min_size: MIN_ELEMENT_SIZE,
            keep_aspect: false,
        }
    }
}

/// Resize `frame` by dragging `handle` by `delta` (canvas space).
///
/// The delta is rotated into the element's local axes, so dragging a grip of
/// a rotated element behaves as the user sees it. The opposite edge or
/// corner stays fixed in canvas space.
pub fn resize(frame: &Frame, handle: ResizeHandle, delta: Point, options: ResizeOptions) -> Frame {
    let (dir_x, dir_y) = handle.direction();
    let local = rotate_vector(delta, -frame.rotation);
    let min_size = options.min_size.max(f64::MIN_POSITIVE);

    let mut width = frame.width + dir_x * local.x;
    let mut height = frame.height + dir_y * local.y;

    if options.keep_aspect && handle.is_corner() && frame.width > 0.0 && frame.height > 0.0 {
        let scale_x = width / frame.width;
        let scale_y = height / frame.height;
        let scale = if (scale_x - 1.0).abs() >= (scale_y - 1.0).abs() {
            scale_x
        } else {
            scale_y
        };
        let scale = scale
            .max(min_size / frame.width)
            .max(min_size / frame.height);
        width = frame.width * scale;
        height = frame.height * scale;
    } else {
        width = width.max(min_size);
        height = height.max(min_size);
    }

    let anchor = handle.anchor(frame);
    let anchor_offset = rotate_vector(
        Point::new(-dir_x * width / 2.0, -dir_y * height / 2.0),
        frame.rotation,
    );
    let center = anchor - anchor_offset;

    Frame {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        rotation: frame.rotation,
    }
}

/// Zoom and pan of the designer surface.
///
/// `screen = canvas * zoom + pan`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
        }
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan: Point) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    pub fn to_canvas(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan + Point::new(dx, dy);
    }

    /// Change zoom while keeping the canvas point under `anchor` (screen
    /// space) in place
    pub fn zoom_at(&mut self, anchor: Point, zoom: f64) {
        let under_anchor = self.to_canvas(anchor);
        self.zoom = clamp_zoom(zoom);
        self.pan = Point::new(
            anchor.x - under_anchor.x * self.zoom,
            anchor.y - under_anchor.y * self.zoom,
        );
    }

    /// Largest zoom that fits the canvas into the view with `padding` on
    /// every side, centred
    pub fn fit(canvas_width: f64, canvas_height: f64, view_width: f64, view_height: f64, padding: f64) -> Self {
        let avail_w = view_width - 2.0 * padding;
        let avail_h = view_height - 2.0 * padding;
        let zoom = if avail_w > 0.0 && avail_h > 0.0 && canvas_width > 0.0 && canvas_height > 0.0 {
            clamp_zoom((avail_w / canvas_width).min(avail_h / canvas_height))
        } else {
            MIN_ZOOM
        };

        Self {
            zoom,
            pan: Point::new(
                (view_width - canvas_width * zoom) / 2.0,
                (view_height - canvas_height * zoom) / 2.0,
            ),
        }
    }
}
