// Licensed under the Apache-2.0 license

//! Phase-tagged byte round trip.
//!
//! The free-form controller and target calls must be issued in one order
//! only: write, store, request, serve, receive. [`RoundTrip`] encodes that
//! order in its type. Each step consumes the value and returns the next
//! phase, so skipping or repeating a step does not compile:
//!
//! ```rust,ignore
//! let reply = RoundTrip::new(&mut controller, &mut target)
//!     .write(0xa5)?
//!     .store()?
//!     .request()?
//!     .serve()?
//!     .receive()?;
//! assert_eq!(reply, 0xa6);
//! ```
//!
//! On error the round trip is dropped. Both roles stay usable through their
//! own APIs.

use crate::i2c::common::Error;
use crate::i2c::traits::target::ByteTarget;
use crate::i2c::traits::ByteController;
use core::marker::PhantomData;

/// Nothing sent yet.
pub struct Idle;
/// Byte is on the bus, not yet taken by the target.
pub struct Written;
/// Target holds the transformed byte.
pub struct Stored;
/// Read command queued by the controller.
pub struct Requested;
/// Target reply on its way to the controller.
pub struct Served;

pub struct RoundTrip<'a, C: ByteController, T: ByteTarget, P> {
    controller: &'a mut C,
    target: &'a mut T,
    _phase: PhantomData<P>,
}

impl<'a, C: ByteController, T: ByteTarget, P> RoundTrip<'a, C, T, P> {
    fn advance<N>(self) -> RoundTrip<'a, C, T, N> {
        RoundTrip {
            controller: self.controller,
            target: self.target,
            _phase: PhantomData,
        }
    }
}

impl<'a, C: ByteController, T: ByteTarget> RoundTrip<'a, C, T, Idle> {
    /// Both roles must already be configured for the same address.
    pub fn new(controller: &'a mut C, target: &'a mut T) -> Self {
        Self {
            controller,
            target,
            _phase: PhantomData,
        }
    }

    /// # Errors
    ///
    /// [`Error::TransmitAbort`] if nobody acknowledged the byte.
    pub fn write(self, byte: u8) -> Result<RoundTrip<'a, C, T, Written>, Error> {
        self.controller.write_byte(byte)?;
        Ok(self.advance())
    }
}

impl<'a, C: ByteController, T: ByteTarget> RoundTrip<'a, C, T, Written> {
    /// # Errors
    ///
    /// Propagates the target's wait failure.
    pub fn store(self) -> Result<RoundTrip<'a, C, T, Stored>, Error> {
        self.target.receive_byte_to_memory()?;
        Ok(self.advance())
    }
}

impl<'a, C: ByteController, T: ByteTarget> RoundTrip<'a, C, T, Stored> {
    /// Byte the target will answer with.
    #[must_use]
    pub fn stored(&self) -> Option<u8> {
        self.target.memory_value()
    }

    /// # Errors
    ///
    /// Propagates the controller's wait failure.
    pub fn request(self) -> Result<RoundTrip<'a, C, T, Requested>, Error> {
        self.controller.request_byte_from_memory()?;
        Ok(self.advance())
    }
}

impl<'a, C: ByteController, T: ByteTarget> RoundTrip<'a, C, T, Requested> {
    /// # Errors
    ///
    /// Propagates the target's wait failure.
    pub fn serve(self) -> Result<RoundTrip<'a, C, T, Served>, Error> {
        self.target.serve_byte_from_memory()?;
        Ok(self.advance())
    }
}

impl<C: ByteController, T: ByteTarget> RoundTrip<'_, C, T, Served> {
    /// Collect the reply and end the round trip.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] under a bounded wait, or
    /// [`Error::NothingRequested`] if the controller lost track of its read.
    pub fn receive(self) -> Result<u8, Error> {
        self.controller
            .receive_requested_byte_from_memory()?
            .ok_or(Error::NothingRequested)
    }
}
