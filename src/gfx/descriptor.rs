//! 描述符槽分配
//!
//! Direct3D 12 后端为 GUI 纹理预留固定数量的着色器资源槽。
//! 空闲槽保存在一个栈里：初始化时按 `n-1 .. 0` 压栈，分配时弹出，
//! 释放时压回，因此最先分配到的总是 0 号槽，最近释放的槽最先被复用。

use std::collections::HashMap;

use tracing::{debug, warn};

use super::host::ContextId;

/// GUI 纹理的描述符槽数量
pub const GUI_DESCRIPTOR_CAPACITY: u32 = 64;

/// 固定容量的描述符槽分配器
#[derive(Debug, Clone)]
pub struct DescriptorSlotAllocator {
    capacity: u32,
    free_indices: Vec<u32>,
}

impl DescriptorSlotAllocator {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            free_indices: (0..capacity).rev().collect(),
        }
    }

    /// 分配一个槽，已满时返回 `None`
    pub fn alloc(&mut self) -> Option<u32> {
        self.free_indices.pop()
    }

    /// 归还一个槽
    pub fn free(&mut self, index: u32) {
        debug_assert!(index < self.capacity);
        debug_assert!(!self.free_indices.contains(&index));
        self.free_indices.push(index);
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// 已分配数量
    pub fn allocated(&self) -> u32 {
        self.capacity - self.free_indices.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.free_indices.is_empty()
    }
}

/// 按 (窗口, 纹理) 记录已分配的槽
#[derive(Debug)]
pub struct TextureSlots {
    allocator: DescriptorSlotAllocator,
    slots: HashMap<(ContextId, egui::TextureId), u32>,
}

impl TextureSlots {
    pub fn new(capacity: u32) -> Self {
        Self {
            allocator: DescriptorSlotAllocator::new(capacity),
            slots: HashMap::new(),
        }
    }

    /// 确保纹理拥有一个槽
    ///
    /// 已有槽时直接返回 `true`；槽已用尽时记录警告并返回 `false`，
    /// 调用方应跳过这个纹理的上传。
    pub fn acquire(&mut self, context: ContextId, texture: egui::TextureId) -> bool {
        if self.slots.contains_key(&(context, texture)) {
            return true;
        }
        match self.allocator.alloc() {
            Some(slot) => {
                debug!(?context, ?texture, slot, "Descriptor slot allocated");
                self.slots.insert((context, texture), slot);
                true
            }
            None => {
                warn!(
                    ?context,
                    ?texture,
                    capacity = self.allocator.capacity(),
                    "Descriptor heap exhausted, skipping texture"
                );
                false
            }
        }
    }

    /// 释放纹理的槽
    pub fn release(&mut self, context: ContextId, texture: egui::TextureId) {
        if let Some(slot) = self.slots.remove(&(context, texture)) {
            self.allocator.free(slot);
        }
    }

    /// 释放某个窗口的全部槽
    pub fn release_context(&mut self, context: ContextId) {
        let owned: Vec<_> = self.slots.keys().filter(|(c, _)| *c == context).copied().collect();
        for key in owned {
            self.release(key.0, key.1);
        }
    }

    pub fn slot(&self, context: ContextId, texture: egui::TextureId) -> Option<u32> {
        self.slots.get(&(context, texture)).copied()
    }

    pub fn allocated(&self) -> u32 {
        self.allocator.allocated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_lifo() {
        let mut allocator = DescriptorSlotAllocator::new(4);
        assert_eq!(allocator.alloc(), Some(0));
        assert_eq!(allocator.alloc(), Some(1));
        assert_eq!(allocator.alloc(), Some(2));

        allocator.free(1);
        assert_eq!(allocator.alloc(), Some(1));
        assert_eq!(allocator.allocated(), 3);
    }

    #[test]
    fn test_exhaustion() {
        let mut allocator = DescriptorSlotAllocator::new(GUI_DESCRIPTOR_CAPACITY);
        for expected in 0..GUI_DESCRIPTOR_CAPACITY {
            assert_eq!(allocator.alloc(), Some(expected));
        }
        assert!(allocator.is_full());
        assert_eq!(allocator.alloc(), None);

        allocator.free(10);
        assert_eq!(allocator.alloc(), Some(10));
    }

    #[test]
    fn test_texture_slots_per_context() {
        let mut slots = TextureSlots::new(2);
        let (a, b) = (ContextId(0), ContextId(1));
        let font = egui::TextureId::Managed(0);

        assert!(slots.acquire(a, font));
        // 同一纹理不会重复占用
        assert!(slots.acquire(a, font));
        assert!(slots.acquire(b, font));
        assert_eq!(slots.allocated(), 2);

        assert!(!slots.acquire(a, egui::TextureId::Managed(1)));

        slots.release_context(a);
        assert_eq!(slots.allocated(), 1);
        assert_eq!(slots.slot(a, font), None);
        assert_eq!(slots.slot(b, font), Some(1));
    }
}
