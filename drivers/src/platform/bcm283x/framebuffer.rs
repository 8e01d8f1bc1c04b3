//! BCM283x Framebuffer Driver
//!
//! Provisions a pixel framebuffer from the VideoCore through the
//! mailbox property interface: one request carries the desired
//! geometry, depth, and pixel order plus the buffer allocation, and
//! the coprocessor answers by rewriting the same buffer in place.
//!
//! The returned descriptor is created once and is immutable for the
//! process lifetime; the coprocessor relinquishes ownership of the
//! pixel memory after allocation, so the driver may hand out an
//! exclusive slice over it.

use super::mailbox::{Channel, Mailbox, response, tags};
use crate::hal::framebuffer::{
    FrameBuffer, FrameBufferConfig, FrameBufferError, FrameBufferInfo, PixelOrder,
};
use core::ptr::{read_volatile, write_volatile};
use core::slice;
use log::info;

/// The two top bits of an allocated buffer address select the
/// coprocessor's cache behavior and are not part of the ARM physical
/// address.
const BUS_ADDRESS_MASK: u32 = 0x3FFF_FFFF;

/// Strip the cache-control bits off a bus address returned by the
/// coprocessor, leaving the ARM physical address.
pub const fn arm_address(bus_address: u32) -> usize {
    (bus_address & BUS_ADDRESS_MASK) as usize
}

/// The one-shot provisioning request.
///
/// Must be 16-byte aligned; the total-size word and every tag's
/// value-buffer-size word must exactly match the words reserved,
/// because the coprocessor trusts them and writes responses straight
/// into the structure.
#[repr(C, align(16))]
struct ProvisionRequest {
    size: u32,
    code: u32,

    // Physical size
    tag_phys: u32,
    buf_size_phys: u32,
    len_phys: u32,
    width_phys: u32,
    height_phys: u32,

    // Virtual size
    tag_virt: u32,
    buf_size_virt: u32,
    len_virt: u32,
    width_virt: u32,
    height_virt: u32,

    // Virtual offset
    tag_offset: u32,
    buf_size_offset: u32,
    len_offset: u32,
    offset_x: u32,
    offset_y: u32,

    // Depth
    tag_depth: u32,
    buf_size_depth: u32,
    len_depth: u32,
    depth: u32,

    // Pixel order
    tag_order: u32,
    buf_size_order: u32,
    len_order: u32,
    pixel_order: u32,

    // Allocate buffer: request carries the preferred alignment,
    // response carries the bus address and byte size
    tag_alloc: u32,
    buf_size_alloc: u32,
    len_alloc: u32,
    address: u32,
    alloc_size: u32,

    // Pitch
    tag_pitch: u32,
    buf_size_pitch: u32,
    len_pitch: u32,
    pitch: u32,

    end: u32,
    _pad: u32,
}

impl ProvisionRequest {
    fn new(config: &FrameBufferConfig) -> Self {
        Self {
            size: core::mem::size_of::<Self>() as u32,
            code: 0,

            tag_phys: tags::SET_PHYSICAL_SIZE,
            buf_size_phys: 8,
            len_phys: 8,
            width_phys: config.width,
            height_phys: config.height,

            tag_virt: tags::SET_VIRTUAL_SIZE,
            buf_size_virt: 8,
            len_virt: 8,
            width_virt: config.virtual_width,
            height_virt: config.virtual_height,

            tag_offset: tags::SET_VIRTUAL_OFFSET,
            buf_size_offset: 8,
            len_offset: 8,
            offset_x: 0,
            offset_y: 0,

            tag_depth: tags::SET_DEPTH,
            buf_size_depth: 4,
            len_depth: 4,
            depth: config.depth,

            tag_order: tags::SET_PIXEL_ORDER,
            buf_size_order: 4,
            len_order: 4,
            pixel_order: config.pixel_order as u32,

            tag_alloc: tags::ALLOCATE_BUFFER,
            buf_size_alloc: 8,
            len_alloc: 8,
            address: config.alignment,
            alloc_size: 0,

            tag_pitch: tags::GET_PITCH,
            buf_size_pitch: 4,
            len_pitch: 4,
            pitch: 0,

            end: tags::LAST,
            _pad: 0,
        }
    }
}

/// BCM283x mailbox-provisioned framebuffer.
pub struct Bcm283xFramebuffer {
    info: FrameBufferInfo,
    buffer: &'static mut [u32],
}

impl Bcm283xFramebuffer {
    /// Provision a framebuffer from the coprocessor.
    ///
    /// On failure no descriptor exists and nothing may be drawn; the
    /// error is the only recoverable failure signal in the whole
    /// polling stack.
    ///
    /// # Safety
    ///
    /// - Mailbox registers must be accessible
    /// - Identity mapping required (physical == virtual)
    /// - Must not race another outstanding mailbox request
    pub unsafe fn new(config: FrameBufferConfig) -> Result<Self, FrameBufferError> {
        // The word-slice view below assumes one u32 per pixel
        if config.depth != 32 {
            return Err(FrameBufferError::InvalidConfig);
        }

        let mut req = ProvisionRequest::new(&config);
        unsafe {
            write_volatile(&mut req.width_phys, config.width);
            write_volatile(&mut req.height_phys, config.height);
            write_volatile(&mut req.width_virt, config.virtual_width);
            write_volatile(&mut req.height_virt, config.virtual_height);
            write_volatile(&mut req.depth, config.depth);
            write_volatile(&mut req.pixel_order, config.pixel_order as u32);
            write_volatile(&mut req.address, config.alignment);
        }
        let req_phys = &raw const req as usize;

        let mut mailbox = unsafe { Mailbox::new() };
        if !unsafe { mailbox.call(Channel::PropertyTags, req_phys) } {
            return Err(FrameBufferError::MailboxFailed);
        }

        // The request fields now hold the response; the coprocessor
        // may have adjusted the geometry, so read everything back.
        let bus_address = unsafe { read_volatile(&req.address) };
        let size = unsafe { read_volatile(&req.alloc_size) };
        let width = unsafe { read_volatile(&req.width_phys) };
        let height = unsafe { read_volatile(&req.height_phys) };
        let pitch = unsafe { read_volatile(&req.pitch) };
        let depth = unsafe { read_volatile(&req.depth) };
        let pixel_order = unsafe { read_volatile(&req.pixel_order) };

        if bus_address == 0 || size == 0 {
            return Err(FrameBufferError::AllocationFailed);
        }

        let address = arm_address(bus_address);

        let info = FrameBufferInfo {
            width,
            height,
            pitch,
            depth,
            pixel_order: if pixel_order == 0 {
                PixelOrder::Bgr
            } else {
                PixelOrder::Rgb
            },
            address,
            size: size as usize,
        };

        info!(
            "framebuffer: {}x{} depth {} pitch {} order {:?} at {:#010X} ({} bytes)",
            info.width, info.height, info.depth, info.pitch, info.pixel_order, info.address, info.size,
        );

        let buffer = unsafe { slice::from_raw_parts_mut(address as *mut u32, size as usize / 4) };

        Ok(Self { info, buffer })
    }

    /// Get the raw mutable pixel slice.
    pub fn buffer_mut(&mut self) -> &mut [u32] {
        self.buffer
    }
}

impl FrameBuffer for Bcm283xFramebuffer {
    fn info(&self) -> &FrameBufferInfo {
        &self.info
    }

    fn clear(&mut self, color: u32) {
        for pixel in self.buffer.iter_mut() {
            *pixel = color;
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: u32) -> bool {
        if x >= self.info.width || y >= self.info.height {
            return false;
        }

        let offset = (y * (self.info.pitch / 4) + x) as usize;
        if offset < self.buffer.len() {
            self.buffer[offset] = color;
            true
        } else {
            false
        }
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.info.width || y >= self.info.height {
            return None;
        }

        let offset = (y * (self.info.pitch / 4) + x) as usize;
        self.buffer.get(offset).copied()
    }
}
