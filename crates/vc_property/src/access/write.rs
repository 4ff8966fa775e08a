use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::accessor::{
    Capability, PropertyAccessor, list_index, meta_cursor, out_of_bounds, unsupported_segment,
};
use crate::access::AccessOptions;
use crate::bean::{BeanRef, Type};
use crate::error::{AccessError, GrowFailure};
use crate::path::{PropertyPath, Segment};
use crate::registry::CapabilityRegistry;
use crate::value::{Value, ValueType};

/// State shared by one write.
struct WriteContext<'p> {
    path: &'p PropertyPath,
    options: &'p AccessOptions,
    raw: Option<Value>,
    new_value: Option<Value>,
}

impl WriteContext<'_> {
    #[inline]
    fn is_last(&self, index: usize) -> bool {
        index + 1 == self.path.len()
    }

    fn grow_disabled(&self, index: usize, owner: Type) -> AccessError {
        AccessError::AutoGrowFailed {
            property: self.path.prefix(index + 1),
            owner,
            reason: GrowFailure::Disabled,
        }
    }
}

impl<R: CapabilityRegistry> PropertyAccessor<R> {
    /// Writes `raw` at `path` below `root`, returning the converted value.
    pub(super) fn write_path(
        &self,
        root: &BeanRef,
        path: &PropertyPath,
        raw: Value,
        options: &AccessOptions,
    ) -> Result<Value, AccessError> {
        let mut ctx = WriteContext {
            path,
            options,
            raw: Some(raw),
            new_value: None,
        };
        self.write_bean(root, 0, &mut ctx)?;
        Ok(ctx.new_value.unwrap_or_default())
    }

    /// Writes segment `index` into `holder`.
    ///
    /// Returns `true` if `holder` itself was modified and must be written back
    /// by its owner. Beans are modified in place and never need it.
    fn write_into(
        &self,
        holder: &mut Value,
        declared: &ValueType,
        owner: Type,
        index: usize,
        ctx: &mut WriteContext<'_>,
    ) -> Result<bool, AccessError> {
        match holder {
            Value::Optional(Some(inner)) => {
                self.write_into(inner, declared.unwrap_optional(), owner, index, ctx)
            }
            Value::Bean(bean) => {
                let bean = bean.clone();
                self.write_bean(&bean, index, ctx).map(|()| false)
            }
            Value::List(items) => self
                .write_list(items, declared.element(), owner, index, ctx)
                .map(|()| true),
            Value::Map(entries) => self
                .write_map(entries, declared.element(), owner, index, ctx)
                .map(|()| true),
            other => Err(unsupported_segment(
                other,
                &ctx.path.segments()[index],
                ctx.path,
                index,
                owner,
            )),
        }
    }

    fn write_bean(
        &self,
        bean: &BeanRef,
        index: usize,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), AccessError> {
        let path = ctx.path;
        let owner = bean.bean_type();
        let name = match &path.segments()[index] {
            Segment::Name(name) => name.as_str(),
            segment => {
                return Err(unsupported_segment(
                    &Value::Bean(bean.clone()),
                    segment,
                    path,
                    index,
                    owner,
                ));
            }
        };
        let capability = self.capability(&owner, name);

        if ctx.is_last(index) {
            let info = match capability {
                Some(Capability::Property(info)) if info.is_writable() => info,
                _ => {
                    return Err(AccessError::NotWritableProperty {
                        property: path.prefix(index + 1),
                        owner,
                        suggestions: self.suggest(&owner, name),
                    });
                }
            };
            let value = self.convert(info.value_type(), index, ctx)?;
            self.invoke_write(bean, info, value.clone(), path, index)?;
            ctx.new_value = Some(value);
            return Ok(());
        }

        let (mut child, declared, info) = match capability {
            Some(Capability::Property(info)) if info.is_readable() => (
                self.invoke_read(bean, info, path, index)?,
                info.value_type().clone(),
                Some(info),
            ),
            Some(Capability::Meta) => {
                let meta = meta_cursor(owner);
                (meta.value, meta.declared, None)
            }
            _ => {
                return Err(AccessError::NotReadableProperty {
                    property: path.prefix(index + 1),
                    owner,
                });
            }
        };
        let setter = info.filter(|info| info.is_writable());
        let read_only = || AccessError::NotWritableProperty {
            property: path.prefix(index + 1),
            owner,
            suggestions: Vec::new(),
        };

        if child.is_absent() {
            if !ctx.options.auto_grow_nested_paths {
                return Err(ctx.grow_disabled(index, owner));
            }
            child = self.grow(&declared, owner, path, index)?;
            let setter = setter.ok_or_else(read_only)?;
            self.invoke_write(bean, setter, child.clone(), path, index)?;
        }

        if self.write_into(&mut child, &declared, owner, index + 1, ctx)? {
            let setter = setter.ok_or_else(read_only)?;
            self.invoke_write(bean, setter, child, path, index)?;
        }
        Ok(())
    }

    fn write_list(
        &self,
        items: &mut Vec<Value>,
        elem: &ValueType,
        owner: Type,
        index: usize,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), AccessError> {
        let path = ctx.path;
        let key = match &path.segments()[index] {
            Segment::Key { key, .. } => key,
            segment => {
                return Err(unsupported_segment(
                    &Value::List(Vec::new()),
                    segment,
                    path,
                    index,
                    owner,
                ));
            }
        };
        let position = list_index(key, path, index, owner)?;

        if position >= items.len() {
            if !ctx.options.auto_grow_nested_paths {
                return Err(out_of_bounds(position, items.len(), path, index, owner));
            }
            let limit = ctx.options.auto_grow_collection_limit;
            if position >= limit {
                return Err(AccessError::AutoGrowFailed {
                    property: path.prefix(index + 1),
                    owner,
                    reason: GrowFailure::LimitExceeded {
                        index: position,
                        limit,
                    },
                });
            }
            log::trace!("growing `{}` to length {}", path.prefix(index), position + 1);
            while items.len() < position {
                let filler = self.filler(elem, owner, path, index)?;
                items.push(filler);
            }
            items.push(Value::Null);
        }

        let slot = &mut items[position];
        if ctx.is_last(index) {
            let value = self.convert(elem, index, ctx)?;
            *slot = value.clone();
            ctx.new_value = Some(value);
            return Ok(());
        }

        if slot.is_absent() {
            if !ctx.options.auto_grow_nested_paths {
                return Err(ctx.grow_disabled(index, owner));
            }
            *slot = self.grow(elem, owner, path, index)?;
        }
        self.write_into(slot, elem, owner, index + 1, ctx)?;
        Ok(())
    }

    fn write_map(
        &self,
        entries: &mut BTreeMap<String, Value>,
        elem: &ValueType,
        owner: Type,
        index: usize,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), AccessError> {
        let path = ctx.path;
        let key = match &path.segments()[index] {
            Segment::Key { key, .. } => key,
            segment => {
                return Err(unsupported_segment(
                    &Value::Map(BTreeMap::new()),
                    segment,
                    path,
                    index,
                    owner,
                ));
            }
        };

        if ctx.is_last(index) {
            let value = self.convert(elem, index, ctx)?;
            entries.insert(key.clone(), value.clone());
            ctx.new_value = Some(value);
            return Ok(());
        }

        if entries.get(key).is_none_or(Value::is_absent) {
            if !ctx.options.auto_grow_nested_paths {
                return Err(ctx.grow_disabled(index, owner));
            }
            let grown = self.grow(elem, owner, path, index)?;
            entries.insert(key.clone(), grown);
        }
        let slot = entries.entry(key.clone()).or_default();
        self.write_into(slot, elem, owner, index + 1, ctx)?;
        Ok(())
    }

    /// Converts the raw value of `ctx` to `target`.
    fn convert(
        &self,
        target: &ValueType,
        index: usize,
        ctx: &mut WriteContext<'_>,
    ) -> Result<Value, AccessError> {
        let raw = ctx.raw.take().unwrap_or_default();
        // The converter only sees the contained type of an optional slot.
        let outcome = match target {
            ValueType::Optional(inner) => match raw {
                Value::Null | Value::Optional(None) => Ok(Value::Optional(None)),
                Value::Optional(Some(value)) => self.converter.convert(*value, inner),
                raw => self.converter.convert(raw, inner),
            }
            .map(|value| Value::Optional(Some(Box::new(value)))),
            _ => self.converter.convert(raw, target),
        };
        outcome.map_err(|source| AccessError::TypeMismatch {
            property: ctx.path.prefix(index + 1),
            source,
        })
    }

    /// Creates the value of a list slot skipped over while growing.
    ///
    /// Scalars take their zero value and containers are grown. Enums have no
    /// such value and fail.
    fn filler(
        &self,
        elem: &ValueType,
        owner: Type,
        path: &PropertyPath,
        index: usize,
    ) -> Result<Value, AccessError> {
        Ok(match elem {
            ValueType::Any | ValueType::Optional(_) => Value::Null,
            ValueType::Bool => Value::Bool(false),
            ValueType::Int(_) => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Char => Value::Char('\0'),
            ValueType::Text => Value::Text(String::new()),
            _ => self.grow(elem, owner, path, index)?,
        })
    }

    /// Creates an empty value for an absent slot declared as `declared`.
    fn grow(
        &self,
        declared: &ValueType,
        owner: Type,
        path: &PropertyPath,
        index: usize,
    ) -> Result<Value, AccessError> {
        let failed = |reason: GrowFailure| AccessError::AutoGrowFailed {
            property: path.prefix(index + 1),
            owner,
            reason,
        };

        let inner = declared.unwrap_optional();
        let value = match inner {
            ValueType::Bean(ty) => Value::Bean(
                self.registry
                    .construct(ty)
                    .map_err(|err| failed(err.into()))?,
            ),
            ValueType::List(_) => Value::List(Vec::new()),
            ValueType::Map(_) => Value::Map(BTreeMap::new()),
            other => return Err(failed(GrowFailure::NotConstructible(other.clone()))),
        };
        log::trace!("auto-growing `{}` with a new `{inner}`", path.prefix(index + 1));

        Ok(if declared.is_optional() {
            Value::Optional(Some(Box::new(value)))
        } else {
            value
        })
    }
}
