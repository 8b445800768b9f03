//! A headless [`LiveTree`].
//!
//! Nodes live in an arena. Slots of removed subtrees are reused.

use crate::{
	error::MemoryError,
	live::{LiveTree, STYLE_ATTRIBUTE},
};
use core::fmt::Write as _;
use hashbrown::HashMap;

/// A handle into a [`MemoryTree`].
///
/// Handles of freed nodes go stale: their slot may be reused, but under a new generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	index: usize,
	generation: u32,
}

impl NodeId {
	#[must_use]
	pub fn index(self) -> usize {
		self.index
	}
}

#[derive(Debug, Clone)]
enum Data {
	Element {
		tag: String,
		attributes: HashMap<String, String>,
		style: Vec<(String, String)>,
	},
	Text(String),
}

#[derive(Debug, Clone)]
struct Slot {
	data: Data,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Entry {
	generation: u32,
	slot: Option<Slot>,
}

/// Nodes removed through [`LiveTree::remove_child`] or replaced through [`LiveTree::replace_child`]
/// are freed together with their descendants, and their handles go stale.
/// Nodes that are never attached stay allocated until the tree is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
	entries: Vec<Entry>,
	free: Vec<usize>,
}

impl MemoryTree {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The number of nodes currently held, attached or not.
	#[must_use]
	pub fn allocated(&self) -> usize {
		self.entries.len() - self.free.len()
	}

	/// Serializes `node` and its descendants as HTML-like markup.
	///
	/// Attributes are sorted by name. Text is not escaped.
	#[must_use]
	pub fn to_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let slot = match self.get(node) {
			Some(slot) => slot,
			None => return,
		};
		match &slot.data {
			Data::Text(text) => html.push_str(text),
			Data::Element { tag, .. } => {
				let tag = tag.to_lowercase();
				let mut names = self.attribute_names(&node);
				names.sort();
				let _ = write!(html, "<{}", tag);
				for name in names {
					let _ = write!(html, " {}=\"{}\"", name, self.attribute(&node, &name).unwrap_or_default());
				}
				html.push('>');
				for &child in &slot.children {
					self.write_html(child, html);
				}
				let _ = write!(html, "</{}>", tag);
			}
		}
	}

	fn get(&self, node: NodeId) -> Option<&Slot> {
		self.entries.get(node.index).filter(|entry| entry.generation == node.generation)?.slot.as_ref()
	}

	fn slot(&self, node: NodeId) -> Result<&Slot, MemoryError> {
		self.get(node).ok_or(MemoryError::UnknownNode(node.index))
	}

	fn slot_mut(&mut self, node: NodeId) -> Result<&mut Slot, MemoryError> {
		self.entries
			.get_mut(node.index)
			.filter(|entry| entry.generation == node.generation)
			.and_then(|entry| entry.slot.as_mut())
			.ok_or(MemoryError::UnknownNode(node.index))
	}

	fn push(&mut self, data: Data) -> NodeId {
		let slot = Slot {
			data,
			parent: None,
			children: Vec::new(),
		};
		if let Some(index) = self.free.pop() {
			let entry = &mut self.entries[index];
			entry.slot = Some(slot);
			return NodeId {
				index,
				generation: entry.generation,
			};
		}
		self.entries.push(Entry { generation: 0, slot: Some(slot) });
		NodeId {
			index: self.entries.len() - 1,
			generation: 0,
		}
	}

	/// Frees `node` and its descendants. `node` must already be detached.
	fn release(&mut self, node: NodeId) {
		let mut pending = vec![node];
		while let Some(node) = pending.pop() {
			let entry = match self.entries.get_mut(node.index) {
				Some(entry) if entry.generation == node.generation => entry,
				_ => continue,
			};
			if let Some(slot) = entry.slot.take() {
				entry.generation = entry.generation.wrapping_add(1);
				self.free.push(node.index);
				pending.extend(slot.children);
			}
		}
	}

	fn element_mut(&mut self, node: NodeId) -> Result<(&mut HashMap<String, String>, &mut Vec<(String, String)>), MemoryError> {
		match &mut self.slot_mut(node)?.data {
			Data::Element { attributes, style, .. } => Ok((attributes, style)),
			Data::Text(_) => Err(MemoryError::NotAnElement(node.index)),
		}
	}

	fn style(&self, node: NodeId) -> Option<&[(String, String)]> {
		match &self.get(node)?.data {
			Data::Element { style, .. } => Some(style),
			Data::Text(_) => None,
		}
	}

	fn index_of(&self, parent: NodeId, child: NodeId) -> Result<usize, MemoryError> {
		self.slot(parent)?.children.iter().position(|&c| c == child).ok_or(MemoryError::NotAChild {
			parent: parent.index,
			child: child.index,
		})
	}

	/// Prepares `child` for insertion into `parent`: checks for cycles and detaches it from its current parent.
	fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<(), MemoryError> {
		if !matches!(self.slot(parent)?.data, Data::Element { .. }) {
			return Err(MemoryError::NotAnElement(parent.index));
		}
		let mut ancestor = Some(parent);
		while let Some(current) = ancestor {
			if current == child {
				return Err(MemoryError::Cycle(child.index));
			}
			ancestor = self.slot(current)?.parent;
		}
		if let Some(previous) = self.slot(child)?.parent {
			let index = self.index_of(previous, child)?;
			self.slot_mut(previous)?.children.remove(index);
		}
		self.slot_mut(child)?.parent = Some(parent);
		Ok(())
	}
}

fn set_style_property(style: &mut Vec<(String, String)>, name: &str, value: &str) {
	match style.iter_mut().find(|(n, _)| n == name) {
		Some((_, v)) => *v = value.to_owned(),
		None => style.push((name.to_owned(), value.to_owned())),
	}
}

fn parse_style(css: &str) -> Vec<(String, String)> {
	let mut style = Vec::new();
	for declaration in css.split(';') {
		if let Some((name, value)) = declaration.split_once(':') {
			let (name, value) = (name.trim(), value.trim());
			if !name.is_empty() {
				set_style_property(&mut style, name, value);
			}
		}
	}
	style
}

/// Sorted by property name, so that the result doesn't depend on application order.
fn serialize_style(style: &[(String, String)]) -> String {
	let mut declarations: Vec<String> = style.iter().map(|(name, value)| format!("{}: {};", name, value)).collect();
	declarations.sort();
	declarations.join(" ")
}

impl LiveTree for MemoryTree {
	type Node = NodeId;
	type Error = MemoryError;

	fn create_element(&mut self, tag: &str) -> Result<NodeId, MemoryError> {
		if tag.is_empty() {
			return Err(MemoryError::EmptyTag);
		}
		Ok(self.push(Data::Element {
			tag: tag.to_owned(),
			attributes: HashMap::new(),
			style: Vec::new(),
		}))
	}

	fn create_text(&mut self, text: &str) -> Result<NodeId, MemoryError> {
		Ok(self.push(Data::Text(text.to_owned())))
	}

	fn tag_name(&self, node: &NodeId) -> Option<String> {
		match &self.get(*node)?.data {
			Data::Element { tag, .. } => Some(tag.clone()),
			Data::Text(_) => None,
		}
	}

	fn text(&self, node: &NodeId) -> Option<String> {
		match &self.get(*node)?.data {
			Data::Text(text) => Some(text.clone()),
			Data::Element { .. } => None,
		}
	}

	fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), MemoryError> {
		match &mut self.slot_mut(*node)?.data {
			Data::Text(data) => {
				*data = text.to_owned();
				Ok(())
			}
			Data::Element { .. } => Err(MemoryError::NotText(node.index)),
		}
	}

	fn attribute_names(&self, element: &NodeId) -> Vec<String> {
		match self.get(*element).map(|slot| &slot.data) {
			Some(Data::Element { attributes, style, .. }) => {
				let mut names: Vec<String> = attributes.keys().cloned().collect();
				if !style.is_empty() {
					names.push(STYLE_ATTRIBUTE.to_owned());
				}
				names
			}
			Some(Data::Text(_)) | None => Vec::new(),
		}
	}

	fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
		if name == STYLE_ATTRIBUTE {
			return self.style(*element).filter(|style| !style.is_empty()).map(serialize_style);
		}
		match &self.get(*element)?.data {
			Data::Element { attributes, .. } => attributes.get(name).cloned(),
			Data::Text(_) => None,
		}
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
		let (attributes, style) = self.element_mut(*element)?;
		if name == STYLE_ATTRIBUTE {
			*style = parse_style(value);
		} else {
			attributes.insert(name.to_owned(), value.to_owned());
		}
		Ok(())
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) -> Result<(), MemoryError> {
		let (attributes, style) = self.element_mut(*element)?;
		if name == STYLE_ATTRIBUTE {
			style.clear();
		} else {
			attributes.remove(name);
		}
		Ok(())
	}

	fn set_style_property(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
		let (_, style) = self.element_mut(*element)?;
		set_style_property(style, name, value);
		Ok(())
	}

	fn remove_style_property(&mut self, element: &NodeId, name: &str) -> Result<(), MemoryError> {
		let (_, style) = self.element_mut(*element)?;
		style.retain(|(n, _)| n != name);
		Ok(())
	}

	fn set_style_text(&mut self, element: &NodeId, css: &str) -> Result<(), MemoryError> {
		let (_, style) = self.element_mut(*element)?;
		*style = parse_style(css);
		Ok(())
	}

	fn child_count(&self, node: &NodeId) -> usize {
		self.get(*node).map_or(0, |slot| slot.children.len())
	}

	fn child(&self, node: &NodeId, index: usize) -> Option<NodeId> {
		self.get(*node)?.children.get(index).copied()
	}

	fn parent(&self, node: &NodeId) -> Option<NodeId> {
		self.get(*node)?.parent
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
		self.adopt(*parent, *child)?;
		self.slot_mut(*parent)?.children.push(*child);
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
		let index = self.index_of(*parent, *child)?;
		self.slot_mut(*parent)?.children.remove(index);
		self.release(*child);
		Ok(())
	}

	fn replace_child(&mut self, parent: &NodeId, new_child: &NodeId, old_child: &NodeId) -> Result<(), MemoryError> {
		if new_child == old_child {
			return self.index_of(*parent, *old_child).map(drop);
		}
		self.index_of(*parent, *old_child)?;
		self.adopt(*parent, *new_child)?;
		let index = self.index_of(*parent, *old_child)?;
		self.slot_mut(*parent)?.children[index] = *new_child;
		self.release(*old_child);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_and_serialize() {
		let mut tree = MemoryTree::new();
		let div = tree.create_element("DIV").unwrap();
		let text = tree.create_text("Hello").unwrap();
		tree.append_child(&div, &text).unwrap();
		tree.set_attribute(&div, "id", "x").unwrap();
		tree.set_style_property(&div, "color", "red").unwrap();

		assert_eq!(tree.to_html(div), r#"<div id="x" style="color: red;">Hello</div>"#);
		assert_eq!(tree.parent(&text), Some(div));
	}

	#[test]
	fn style_round_trips_through_the_attribute() {
		let mut tree = MemoryTree::new();
		let div = tree.create_element("DIV").unwrap();
		tree.set_style_text(&div, "color: red; margin : 0 ;;").unwrap();
		assert_eq!(tree.attribute(&div, "style").as_deref(), Some("color: red; margin: 0;"));

		tree.remove_style_property(&div, "color").unwrap();
		assert_eq!(tree.attribute(&div, "style").as_deref(), Some("margin: 0;"));

		tree.remove_attribute(&div, "style").unwrap();
		assert!(tree.attribute_names(&div).is_empty());
	}

	#[test]
	fn appending_moves_nodes() {
		let mut tree = MemoryTree::new();
		let a = tree.create_element("A").unwrap();
		let b = tree.create_element("B").unwrap();
		let text = tree.create_text("t").unwrap();
		tree.append_child(&a, &text).unwrap();
		tree.append_child(&b, &text).unwrap();

		assert_eq!(tree.child_count(&a), 0);
		assert_eq!(tree.child(&b, 0), Some(text));
	}

	#[test]
	fn replace_and_remove() {
		let mut tree = MemoryTree::new();
		let root = tree.create_element("ROOT").unwrap();
		let old = tree.create_text("old").unwrap();
		let new = tree.create_text("new").unwrap();
		tree.append_child(&root, &old).unwrap();

		tree.replace_child(&root, &new, &old).unwrap();
		assert_eq!(tree.parent(&old), None);
		assert_eq!(tree.to_html(root), "<root>new</root>");

		assert_eq!(tree.remove_child(&root, &old), Err(MemoryError::NotAChild { parent: root.index(), child: old.index() }));
		tree.remove_child(&root, &new).unwrap();
		assert_eq!(tree.child_count(&root), 0);
	}

	#[test]
	fn rejects_cycles_and_text_parents() {
		let mut tree = MemoryTree::new();
		let outer = tree.create_element("OUTER").unwrap();
		let inner = tree.create_element("INNER").unwrap();
		let text = tree.create_text("t").unwrap();
		tree.append_child(&outer, &inner).unwrap();

		assert_eq!(tree.append_child(&inner, &outer), Err(MemoryError::Cycle(outer.index())));
		assert_eq!(tree.append_child(&text, &inner), Err(MemoryError::NotAnElement(text.index())));
		assert_eq!(tree.create_element(""), Err(MemoryError::EmptyTag));
	}

	#[test]
	fn removed_subtrees_are_reclaimed() {
		let mut tree = MemoryTree::new();
		let root = tree.create_element("ROOT").unwrap();
		let list = tree.create_element("UL").unwrap();
		let item = tree.create_text("item").unwrap();
		tree.append_child(&list, &item).unwrap();
		tree.append_child(&root, &list).unwrap();
		assert_eq!(tree.allocated(), 3);

		tree.remove_child(&root, &list).unwrap();
		assert_eq!(tree.allocated(), 1);
		assert_eq!(tree.text(&item), None);
		assert_eq!(tree.set_text(&item, "stale"), Err(MemoryError::UnknownNode(item.index())));

		let reused = tree.create_text("new").unwrap();
		assert_ne!(reused, item);
		assert_ne!(reused, list);
		assert_eq!(tree.text(&item), None);
		assert_eq!(tree.text(&reused).as_deref(), Some("new"));
		assert_eq!(tree.allocated(), 2);
	}
}
