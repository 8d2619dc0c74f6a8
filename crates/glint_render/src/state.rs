//! Memoized device state
//!
//! Every piece of mutable pipeline state lives in a [`StateSlot`]. A request
//! reaches the device only when it differs from the cached value, and the
//! whole value is compared and replaced at once.

use crate::backend::Device;
use crate::types::*;

/// A cached piece of device state.
///
/// `None` means the device value is not known, so the next request always
/// goes through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StateSlot<T> {
    value: Option<T>,
}

impl<T: Copy + PartialEq> StateSlot<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            value: Some(initial),
        }
    }

    pub const fn unknown() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<T> {
        self.value
    }

    pub fn matches(&self, desired: T) -> bool {
        self.value == Some(desired)
    }

    /// Push `desired` through `issue` unless it is already cached.
    /// Returns whether the call was issued.
    pub fn apply(&mut self, desired: T, issue: impl FnOnce(T)) -> bool {
        if self.matches(desired) {
            return false;
        }
        issue(desired);
        self.value = Some(desired);
        true
    }
}

/// Front and back copies of a face-directional slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PerFace<T> {
    faces: [StateSlot<T>; Face::COUNT],
}

impl<T: Copy + PartialEq> PerFace<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            faces: [StateSlot::new(initial), StateSlot::new(initial)],
        }
    }

    pub fn get(&self, face: Face) -> Option<T> {
        self.faces[face.index()].get()
    }

    /// Apply `desired` to the selected faces with a single call.
    ///
    /// A both-faces request is elided only if both faces already hold
    /// `desired`.
    pub fn apply(
        &mut self,
        selection: FaceSelection,
        desired: T,
        issue: impl FnOnce(FaceSelection, T),
    ) -> bool {
        let faces = selection.faces();
        if faces.iter().all(|face| self.faces[face.index()].matches(desired)) {
            return false;
        }
        issue(selection, desired);
        for face in faces {
            self.faces[face.index()].value = Some(desired);
        }
        true
    }
}

fn note(issued: bool, what: &'static str) -> bool {
    if !issued {
        tracing::trace!("redundant {what} change ignored");
    }
    issued
}

/// Cached copy of all pipeline state of one context.
///
/// Function and equation tuples are cached independently of the
/// enable/disable toggles: disabling a feature leaves its tuple cache intact.
#[derive(Debug, Clone)]
pub struct StateCache {
    toggles: [StateSlot<bool>; Capability::COUNT],
    blend_functions: StateSlot<BlendFunctions>,
    blend_equations: StateSlot<BlendEquations>,
    cull_faces: StateSlot<FaceSelection>,
    front_face: StateSlot<FaceWindingOrder>,
    depth_function: StateSlot<DepthFunction>,
    depth_write: StateSlot<bool>,
    stencil_test: PerFace<StencilTest>,
    stencil_mask: PerFace<u32>,
    stencil_operations: PerFace<StencilOperations>,
    color_mask: StateSlot<ColorMask>,
    polygon_mode: StateSlot<PolygonMode>,
    scissor: StateSlot<ScissorArea>,
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCache {
    /// Cache initialised to the device defaults.
    ///
    /// Blend functions and equations start unknown so the first enable
    /// always pushes them; the scissor box depends on the window and starts
    /// unknown too.
    pub fn new() -> Self {
        Self {
            toggles: [StateSlot::new(false); Capability::COUNT],
            blend_functions: StateSlot::unknown(),
            blend_equations: StateSlot::unknown(),
            cull_faces: StateSlot::new(FaceSelection::Back),
            front_face: StateSlot::new(FaceWindingOrder::CounterClockwise),
            depth_function: StateSlot::new(DepthFunction::Less),
            depth_write: StateSlot::new(true),
            stencil_test: PerFace::new(StencilTest::default()),
            stencil_mask: PerFace::new(u32::MAX),
            stencil_operations: PerFace::new(StencilOperations::default()),
            color_mask: StateSlot::new(ColorMask::ALL),
            polygon_mode: StateSlot::new(PolygonMode::Fill),
            scissor: StateSlot::unknown(),
        }
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.toggles[capability.index()].matches(true)
    }

    pub fn set_toggle<D: Device>(
        &mut self,
        device: &mut D,
        capability: Capability,
        enabled: bool,
    ) -> bool {
        let issued = self.toggles[capability.index()]
            .apply(enabled, |enabled| device.set_capability(capability, enabled));
        if !issued {
            tracing::trace!(?capability, enabled, "redundant toggle ignored");
        }
        issued
    }

    pub fn blend_functions(&self) -> Option<BlendFunctions> {
        self.blend_functions.get()
    }

    pub fn set_blend_functions<D: Device>(
        &mut self,
        device: &mut D,
        functions: BlendFunctions,
    ) -> bool {
        note(
            self.blend_functions
                .apply(functions, |f| device.blend_functions(f)),
            "blend function",
        )
    }

    pub fn blend_equations(&self) -> Option<BlendEquations> {
        self.blend_equations.get()
    }

    pub fn set_blend_equations<D: Device>(
        &mut self,
        device: &mut D,
        equations: BlendEquations,
    ) -> bool {
        note(
            self.blend_equations
                .apply(equations, |e| device.blend_equations(e)),
            "blend equation",
        )
    }

    pub fn cull_faces(&self) -> Option<FaceSelection> {
        self.cull_faces.get()
    }

    pub fn set_cull_faces<D: Device>(&mut self, device: &mut D, faces: FaceSelection) -> bool {
        note(
            self.cull_faces.apply(faces, |f| device.cull_face(f)),
            "cull face",
        )
    }

    pub fn front_face(&self) -> Option<FaceWindingOrder> {
        self.front_face.get()
    }

    pub fn set_front_face<D: Device>(&mut self, device: &mut D, order: FaceWindingOrder) -> bool {
        note(
            self.front_face.apply(order, |o| device.front_face(o)),
            "winding order",
        )
    }

    pub fn depth_function(&self) -> Option<DepthFunction> {
        self.depth_function.get()
    }

    pub fn set_depth_function<D: Device>(
        &mut self,
        device: &mut D,
        function: DepthFunction,
    ) -> bool {
        note(
            self.depth_function
                .apply(function, |f| device.depth_function(f)),
            "depth function",
        )
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write.matches(true)
    }

    pub fn set_depth_write<D: Device>(&mut self, device: &mut D, enabled: bool) -> bool {
        note(
            self.depth_write.apply(enabled, |e| device.depth_write(e)),
            "depth write",
        )
    }

    pub fn stencil_test(&self, face: Face) -> Option<StencilTest> {
        self.stencil_test.get(face)
    }

    pub fn set_stencil_test<D: Device>(
        &mut self,
        device: &mut D,
        faces: FaceSelection,
        test: StencilTest,
    ) -> bool {
        note(
            self.stencil_test
                .apply(faces, test, |f, t| device.stencil_function(f, t)),
            "stencil function",
        )
    }

    pub fn stencil_mask(&self, face: Face) -> Option<u32> {
        self.stencil_mask.get(face)
    }

    pub fn set_stencil_mask<D: Device>(
        &mut self,
        device: &mut D,
        faces: FaceSelection,
        mask: u32,
    ) -> bool {
        note(
            self.stencil_mask
                .apply(faces, mask, |f, m| device.stencil_mask(f, m)),
            "stencil mask",
        )
    }

    pub fn stencil_operations(&self, face: Face) -> Option<StencilOperations> {
        self.stencil_operations.get(face)
    }

    pub fn set_stencil_operations<D: Device>(
        &mut self,
        device: &mut D,
        faces: FaceSelection,
        operations: StencilOperations,
    ) -> bool {
        note(
            self.stencil_operations
                .apply(faces, operations, |f, o| device.stencil_operations(f, o)),
            "stencil operation",
        )
    }

    pub fn color_mask(&self) -> ColorMask {
        self.color_mask.get().unwrap_or_default()
    }

    pub fn set_color_mask<D: Device>(&mut self, device: &mut D, mask: ColorMask) -> bool {
        note(
            self.color_mask.apply(mask, |m| device.color_mask(m)),
            "color mask",
        )
    }

    pub fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode.get().unwrap_or_default()
    }

    pub fn set_polygon_mode<D: Device>(&mut self, device: &mut D, mode: PolygonMode) -> bool {
        note(
            self.polygon_mode.apply(mode, |m| device.polygon_mode(m)),
            "polygon mode",
        )
    }

    pub fn scissor(&self) -> Option<ScissorArea> {
        self.scissor.get()
    }

    pub fn set_scissor<D: Device>(&mut self, device: &mut D, area: ScissorArea) -> bool {
        note(self.scissor.apply(area, |a| device.scissor(a)), "scissor area")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{DeviceCall, RecordingDevice};

    #[test]
    fn slot_issues_only_on_change() {
        let mut slot = StateSlot::new(1);
        let mut calls = 0;

        assert!(!slot.apply(1, |_| calls += 1));
        assert!(slot.apply(2, |_| calls += 1));
        assert!(!slot.apply(2, |_| calls += 1));
        assert_eq!(calls, 1);
        assert_eq!(slot.get(), Some(2));
    }

    #[test]
    fn unknown_slot_always_issues_first() {
        let mut slot = StateSlot::<u8>::unknown();
        assert!(slot.apply(0, |_| {}));
        assert!(!slot.apply(0, |_| {}));
    }

    #[test]
    fn per_face_single_face_leaves_other_alone() {
        let mut slot = PerFace::new(0u32);
        assert!(slot.apply(FaceSelection::Front, 7, |_, _| {}));
        assert_eq!(slot.get(Face::Front), Some(7));
        assert_eq!(slot.get(Face::Back), Some(0));
    }

    #[test]
    fn per_face_both_elided_only_when_both_match() {
        let mut slot = PerFace::new(0u32);
        let mut calls = Vec::new();

        slot.apply(FaceSelection::Front, 7, |f, v| calls.push((f, v)));
        // Back still differs, so this must go through once.
        slot.apply(FaceSelection::FrontAndBack, 7, |f, v| calls.push((f, v)));
        slot.apply(FaceSelection::FrontAndBack, 7, |f, v| calls.push((f, v)));
        slot.apply(FaceSelection::Back, 7, |f, v| calls.push((f, v)));

        assert_eq!(
            calls,
            vec![(FaceSelection::Front, 7), (FaceSelection::FrontAndBack, 7)]
        );
    }

    #[test]
    fn compound_tuples_replace_atomically() {
        let mut device = RecordingDevice::new();
        let mut cache = StateCache::new();
        let a = BlendFunctions::uniform(BlendFunction::One, BlendFunction::One);
        let b = BlendFunctions {
            destination_alpha: BlendFunction::Zero,
            ..a
        };

        assert!(cache.set_blend_functions(&mut device, a));
        assert!(cache.set_blend_functions(&mut device, b));
        assert!(!cache.set_blend_functions(&mut device, b));
        assert_eq!(cache.blend_functions(), Some(b));
        assert_eq!(
            device.count(|c| matches!(c, DeviceCall::BlendFunctions(_))),
            2
        );
    }

    #[test]
    fn toggles_start_disabled() {
        let mut device = RecordingDevice::new();
        let mut cache = StateCache::new();

        for capability in Capability::ALL {
            assert!(!cache.is_enabled(capability));
            assert!(!cache.set_toggle(&mut device, capability, false));
        }
        assert!(device.calls().is_empty());
    }
}
