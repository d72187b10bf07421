//! # Scene
//!
//! The object container the tools operate on: objects, which of them are
//! selected, which one is active, and the 3D cursor used to place
//! auxiliary primitives.

use crate::error::{ToolError, ToolResult};
use crate::object::{ModelObject, ObjectId, Transform};
use glam::DVec3;
use resin_mesh::Mesh;

/// Scene graph seen by the tools.
///
/// Object names are unique within a scene; an implementation resolves
/// clashes when adding, duplicating or renaming.
pub trait Scene {
    /// Adds an object and returns its id. The name may be adjusted to stay unique.
    fn add_object(&mut self, name: &str, mesh: Mesh, transform: Transform) -> ObjectId;

    fn object(&self, id: ObjectId) -> Option<&ModelObject>;

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut ModelObject>;

    /// Removes an object, dropping it from the selection as well.
    fn remove_object(&mut self, id: ObjectId) -> Option<ModelObject>;

    /// Copies an object with its own mesh. The copy is not selected.
    fn duplicate_object(&mut self, id: ObjectId) -> Option<ObjectId>;

    /// Renames an object and returns the name it actually received.
    fn rename_object(&mut self, id: ObjectId, name: &str) -> Option<String>;

    /// All object ids in creation order.
    fn object_ids(&self) -> Vec<ObjectId>;

    /// Selected object ids in selection order.
    fn selected(&self) -> Vec<ObjectId>;

    /// Replaces the selection. Unknown ids are ignored.
    fn set_selection(&mut self, ids: &[ObjectId]);

    fn active(&self) -> Option<ObjectId>;

    fn set_active(&mut self, id: Option<ObjectId>);

    fn cursor(&self) -> DVec3;

    fn set_cursor(&mut self, position: DVec3);

    /// Looks up an object, failing with a precondition error when missing.
    fn get(&self, id: ObjectId) -> ToolResult<&ModelObject> {
        self.object(id).ok_or_else(|| ToolError::unknown_object(id))
    }

    /// Mutable variant of [`Scene::get`].
    fn get_mut(&mut self, id: ObjectId) -> ToolResult<&mut ModelObject> {
        self.object_mut(id).ok_or_else(|| ToolError::unknown_object(id))
    }

    /// Makes `id` the only selected object and the active one.
    fn select_only(&mut self, id: ObjectId) {
        self.set_selection(&[id]);
        self.set_active(Some(id));
    }
}

/// In-memory [`Scene`].
///
/// # Example
///
/// ```rust
/// use resin_bases::{MemoryScene, Scene, Transform};
/// use resin_mesh::Mesh;
///
/// let mut scene = MemoryScene::new();
/// let a = scene.add_object("base", Mesh::new(), Transform::IDENTITY);
/// let b = scene.add_object("base", Mesh::new(), Transform::IDENTITY);
/// assert_eq!(scene.get(b).unwrap().name, "base.001");
/// scene.select_only(a);
/// assert_eq!(scene.selected(), vec![a]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryScene {
    objects: Vec<ModelObject>,
    next_id: u64,
    selection: Vec<ObjectId>,
    active: Option<ObjectId>,
    cursor: DVec3,
}

impl MemoryScene {
    /// Creates an empty scene with the cursor at the world origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true when the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates the objects in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelObject> {
        self.objects.iter()
    }

    /// Finds an object by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&ModelObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    fn name_taken(&self, name: &str, except: Option<ObjectId>) -> bool {
        self.objects
            .iter()
            .any(|o| o.name == name && Some(o.id) != except)
    }

    /// Returns `name`, or `name.001`, `name.002`... for the first free slot.
    fn unique_name(&self, name: &str, except: Option<ObjectId>) -> String {
        if !self.name_taken(name, except) {
            return name.to_string();
        }
        let stem = strip_numeric_suffix(name);
        (1u32..)
            .map(|n| format!("{stem}.{n:03}"))
            .find(|candidate| !self.name_taken(candidate, except))
            .unwrap_or_else(|| name.to_string())
    }

    fn allocate_id(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }
}

/// Strips a trailing `.NNN` counter.
fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, digits)) if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()) => {
            stem
        }
        _ => name,
    }
}

impl Scene for MemoryScene {
    fn add_object(&mut self, name: &str, mesh: Mesh, transform: Transform) -> ObjectId {
        let id = self.allocate_id();
        let name = self.unique_name(name, None);
        self.objects.push(ModelObject {
            id,
            name,
            mesh,
            transform,
        });
        id
    }

    fn object(&self, id: ObjectId) -> Option<&ModelObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut ModelObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<ModelObject> {
        let index = self.position(id)?;
        self.selection.retain(|&s| s != id);
        if self.active == Some(id) {
            self.active = None;
        }
        Some(self.objects.remove(index))
    }

    fn duplicate_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        let source = self.object(id)?.clone();
        Some(self.add_object(&source.name, source.mesh, source.transform))
    }

    fn rename_object(&mut self, id: ObjectId, name: &str) -> Option<String> {
        let name = self.unique_name(name, Some(id));
        let object = self.object_mut(id)?;
        object.name = name.clone();
        Some(name)
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    fn selected(&self) -> Vec<ObjectId> {
        self.selection.clone()
    }

    fn set_selection(&mut self, ids: &[ObjectId]) {
        self.selection.clear();
        for &id in ids {
            if self.position(id).is_some() && !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    fn active(&self) -> Option<ObjectId> {
        self.active
    }

    fn set_active(&mut self, id: Option<ObjectId>) {
        self.active = id.filter(|&id| self.position(id).is_some());
    }

    fn cursor(&self) -> DVec3 {
        self.cursor
    }

    fn set_cursor(&mut self, position: DVec3) {
        self.cursor = position;
    }
}
