/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cbor_canon dispatch registries (C7)
 *
 * Unlike the jump tables of C3 (closed, compile-time, baked into the binary) these two registries
 * are the codec's open extension points: callers populate them at or before the `encode`/`decode`
 * call (§3.4 lifecycles) and they are read-only for the duration of that call. Grounded in the
 * teacher's `Allowable`/`Filter` configuration pattern (`utils.rs`), generalized here from a
 * bitflag allow-list to a name-/number-keyed map of callbacks, since the spec's registries carry
 * behavior (encoders, tag decoders) rather than a yes/no per type.
 **************************************************************************************************/
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::token::Token;
use crate::value::{LogicalType, Value};

/// Signature of a user-supplied type encoder (§6.2): given a value of the type it was registered
/// for, return the tokens to emit in its place, or `None` to defer to the default emitter.
pub type TypeEncoderFn = dyn Fn(&Value) -> Option<Vec<Token>>;

/// Signature of a user-supplied tag decoder (§6.3): given the already-decoded inner value of a
/// tagged item, return the value the tag should produce (or an error, e.g. a malformed
/// date/time payload under the `chrono` feature's tag 0 decoder).
pub type TagDecoderFn = dyn Fn(Value) -> Result<Value>;

/// The `typeEncoders` registry (§4.4 step 2, §4.7): logical-type-name keyed encoder overrides.
#[derive(Clone, Default)]
pub struct TypeEncoders(HashMap<LogicalType, Rc<TypeEncoderFn>>);

impl TypeEncoders {
    /// An empty registry - every value falls through to the default emitter.
    pub fn new() -> TypeEncoders {
        TypeEncoders(HashMap::new())
    }

    /// Register an encoder for `logical_type`, overriding the default emitter for that type.
    pub fn register<F>(&mut self, logical_type: LogicalType, encoder: F)
    where
        F: Fn(&Value) -> Option<Vec<Token>> + 'static,
    {
        self.0.insert(logical_type, Rc::new(encoder));
    }

    /// Look up the encoder registered for `logical_type`, if any.
    pub fn get(&self, logical_type: LogicalType) -> Option<&Rc<TypeEncoderFn>> {
        self.0.get(&logical_type)
    }
}

impl fmt::Debug for TypeEncoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEncoders")
            .field("registered", &self.0.len())
            .finish()
    }
}

/// The `tags` registry (§4.5, §4.7): tag-number keyed decoders.
#[derive(Clone, Default)]
pub struct TagDecoders(HashMap<u64, Rc<TagDecoderFn>>);

impl TagDecoders {
    /// An empty registry - every tag is unknown and fails decode with `UnknownTag`.
    pub fn new() -> TagDecoders {
        TagDecoders(HashMap::new())
    }

    /// Register a decoder for `tag`.
    pub fn register<F>(&mut self, tag: u64, decoder: F)
    where
        F: Fn(Value) -> Result<Value> + 'static,
    {
        self.0.insert(tag, Rc::new(decoder));
    }

    /// Look up the decoder registered for `tag`, if any.
    pub fn get(&self, tag: u64) -> Option<&Rc<TagDecoderFn>> {
        self.0.get(&tag)
    }
}

impl fmt::Debug for TagDecoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDecoders")
            .field("registered", &self.0.len())
            .finish()
    }
}
