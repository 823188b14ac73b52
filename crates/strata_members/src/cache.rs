//! The per-class member cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use strata_common::{Epoch, Ident, InternalError, ModificationTracker, StrataResult};

use crate::errors;
use crate::host::MemberEnv;
use crate::memo::Memo;
use crate::owner::{ClassOwner, Member, MemberKind, MethodMember};
use crate::synthetic::{self, SyntheticMethod};

/// Lazily computed member lists and name indexes of one class.
///
/// The cache borrows its owner and so can never outlive it. Every entry is
/// stamped with the [`Epoch`] it was computed in (the host's modification
/// count plus this cache's own tracker) and is recomputed on the first read
/// after either counter moves. Member lists are the owner's own members
/// followed by augmented ones, in provider order.
///
/// Reads may run concurrently. Structural changes to the owner and calls to
/// [`drop_caches`](Self::drop_caches) must be serialized by the host against
/// reads, as the cache does not lock the owner.
pub struct ClassMembers<'a, O: ClassOwner> {
    owner: &'a O,
    env: MemberEnv<'a, O>,
    tracker: ModificationTracker,
    constructors: Memo<Vec<O::Method>>,
    fields: Memo<Vec<O::Field>>,
    methods: Memo<Vec<O::Method>>,
    inner_types: Memo<Vec<O::InnerType>>,
    field_index: Memo<Arc<HashMap<Ident, O::Field>>>,
    method_index: Memo<Arc<HashMap<Ident, Vec<O::Method>>>>,
    inner_type_index: Memo<Arc<HashMap<Ident, O::InnerType>>>,
    values_method: Memo<SyntheticMethod<O::Method>>,
    value_of_method: Memo<SyntheticMethod<O::Method>>,
}

impl<'a, O: ClassOwner> ClassMembers<'a, O> {
    /// Creates an empty cache over `owner`. Nothing is computed until queried.
    pub fn new(owner: &'a O, env: MemberEnv<'a, O>) -> Self {
        Self {
            owner,
            env,
            tracker: ModificationTracker::new(),
            constructors: Memo::new(),
            fields: Memo::new(),
            methods: Memo::new(),
            inner_types: Memo::new(),
            field_index: Memo::new(),
            method_index: Memo::new(),
            inner_type_index: Memo::new(),
            values_method: Memo::new(),
            value_of_method: Memo::new(),
        }
    }

    /// The class this cache describes.
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Constructors, own first, then augmented.
    pub fn constructors(&self) -> Vec<O::Method> {
        self.constructors.get_or_compute(self.epoch(), || {
            self.log_recompute(MemberKind::Constructor);
            self.methods()
                .into_iter()
                .filter(|method| method.is_constructor())
                .collect()
        })
    }

    /// Fields, own first, then augmented.
    pub fn fields(&self) -> Vec<O::Field> {
        self.fields.get_or_compute(self.epoch(), || {
            self.log_recompute(MemberKind::Field);
            let mut fields = self.owner.own_fields();
            if self.env.settings.collect_augments {
                fields.extend(self.env.augments.fields(self.owner));
            }
            fields
        })
    }

    /// Methods (constructors included), own first, then augmented.
    pub fn methods(&self) -> Vec<O::Method> {
        self.methods.get_or_compute(self.epoch(), || {
            self.log_recompute(MemberKind::Method);
            let mut methods = self.owner.own_methods();
            if self.env.settings.collect_augments {
                methods.extend(self.env.augments.methods(self.owner));
            }
            methods
        })
    }

    /// Inner types, own first, then augmented.
    pub fn inner_types(&self) -> Vec<O::InnerType> {
        self.inner_types.get_or_compute(self.epoch(), || {
            self.log_recompute(MemberKind::InnerType);
            let mut inner_types = self.owner.own_inner_types();
            if self.env.settings.collect_augments {
                inner_types.extend(self.env.augments.inner_types(self.owner));
            }
            inner_types
        })
    }

    /// Finds a field by name.
    ///
    /// With `check_bases`, the whole hierarchy is searched by the host's
    /// resolver and this cache is not consulted. Otherwise only this class's
    /// own and augmented fields are searched; an own field shadows an
    /// augmented one of the same name.
    pub fn find_field(&self, name: Ident, check_bases: bool) -> Option<O::Field> {
        if check_bases {
            return self.env.resolver.find_field(self.owner, name);
        }
        self.field_index().get(&name).cloned()
    }

    /// Finds all methods with the given name, in member order.
    ///
    /// Returns an empty vector when there are none. `check_bases` behaves as
    /// in [`find_field`](Self::find_field).
    pub fn find_methods(&self, name: Ident, check_bases: bool) -> Vec<O::Method> {
        if check_bases {
            return self.env.resolver.find_methods(self.owner, name);
        }
        self.method_index()
            .get(&name)
            .cloned()
            .unwrap_or_default()
    }

    /// Finds an inner type by name. `check_bases` behaves as in
    /// [`find_field`](Self::find_field).
    pub fn find_inner_type(&self, name: Ident, check_bases: bool) -> Option<O::InnerType> {
        if check_bases {
            return self.env.resolver.find_inner_type(self.owner, name);
        }
        self.inner_type_index().get(&name).cloned()
    }

    /// The implicit `public static E[] values()` method of a named enum.
    ///
    /// Returns `Ok(None)` if the owner is not an enum, is anonymous, or enum
    /// methods are disabled. An `Err` means the element factory rejected the
    /// internally generated text.
    pub fn values_method(&self) -> StrataResult<Option<SyntheticMethod<O::Method>>> {
        self.enum_method(&self.values_method, synthetic::values_method_text)
    }

    /// The implicit `public static E valueOf(String)` method of a named enum.
    ///
    /// Same preconditions and errors as [`values_method`](Self::values_method).
    pub fn value_of_method(&self) -> StrataResult<Option<SyntheticMethod<O::Method>>> {
        self.enum_method(&self.value_of_method, synthetic::value_of_method_text)
    }

    /// Invalidates every entry. The next query of each kind recomputes it
    /// from the owner's current state.
    pub fn drop_caches(&self) {
        let local = self.tracker.increment();
        tracing::trace!(owner = ?self.owner.id(), local, "dropped class member caches");
    }

    /// Total number of entries computed so far, across all query kinds.
    pub fn computations(&self) -> usize {
        self.constructors.computations()
            + self.fields.computations()
            + self.methods.computations()
            + self.inner_types.computations()
            + self.field_index.computations()
            + self.method_index.computations()
            + self.inner_type_index.computations()
            + self.values_method.computations()
            + self.value_of_method.computations()
    }

    fn epoch(&self) -> Epoch {
        Epoch::capture(self.env.modifications, &self.tracker)
    }

    fn field_index(&self) -> Arc<HashMap<Ident, O::Field>> {
        self.field_index.get_or_compute(self.epoch(), || {
            Arc::new(self.index_by_name(MemberKind::Field, self.fields()))
        })
    }

    fn inner_type_index(&self) -> Arc<HashMap<Ident, O::InnerType>> {
        self.inner_type_index.get_or_compute(self.epoch(), || {
            Arc::new(self.index_by_name(MemberKind::InnerType, self.inner_types()))
        })
    }

    fn method_index(&self) -> Arc<HashMap<Ident, Vec<O::Method>>> {
        self.method_index.get_or_compute(self.epoch(), || {
            let methods = self.methods();
            let mut index: HashMap<Ident, Vec<O::Method>> = HashMap::new();
            for method in methods {
                match method.name() {
                    Some(name) => index.entry(name).or_default().push(method),
                    None => self.report_unnamed(MemberKind::Method, &method),
                }
            }
            Arc::new(index)
        })
    }

    /// Indexes `members` by name in order. The first member of a name wins,
    /// except that a member declared by the owner replaces an externally
    /// defined one already in the index.
    fn index_by_name<M: Member>(&self, kind: MemberKind, members: Vec<M>) -> HashMap<Ident, M> {
        let mut index = HashMap::with_capacity(members.len());
        for member in members {
            let Some(name) = member.name() else {
                self.report_unnamed(kind, &member);
                continue;
            };
            match index.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(member);
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().is_externally_defined() && !member.is_externally_defined() {
                        slot.insert(member);
                    }
                }
            }
        }
        index
    }

    fn enum_method(
        &self,
        memo: &Memo<SyntheticMethod<O::Method>>,
        template: fn(&str) -> String,
    ) -> StrataResult<Option<SyntheticMethod<O::Method>>> {
        if !self.env.settings.synthesize_enum_methods || !self.owner.is_enum() {
            return Ok(None);
        }
        let Some(name) = self.owner.name() else {
            return Ok(None);
        };
        let method = memo.try_get_or_compute(self.epoch(), || {
            let text = template(self.env.interner.resolve(name));
            tracing::debug!(owner = ?self.owner.id(), %text, "materializing synthetic enum method");
            let method = self.env.factory.create_method_from_text(&text, self.owner)?;
            Ok::<_, InternalError>(SyntheticMethod::new(method, self.owner.span()))
        })?;
        Ok(Some(method))
    }

    fn report_unnamed<M: Member>(&self, kind: MemberKind, member: &M) {
        let owner_name = self
            .owner
            .name()
            .map_or("<anonymous>", |name| self.env.interner.resolve(name));
        tracing::error!(owner = ?self.owner.id(), %kind, "member without a name skipped");
        self.env.sink.emit(errors::unnamed_member(
            kind,
            owner_name,
            member.span(),
            self.owner.span(),
            self.env.settings.malformed_severity,
        ));
    }

    fn log_recompute(&self, kind: MemberKind) {
        tracing::debug!(owner = ?self.owner.id(), %kind, "recomputing class members");
    }
}
