//! Create, update and delete for resources that the API lets clients write.
//!
//! A verb runs in four steps: the type's [`Capabilities`] must allow it, a
//! [`Transport`] must be resolvable, the transport is authenticated if needed,
//! and finally the type's [`LifecycleHooks`] perform the network call.
//! [`WritableResource`] adds a stored client reference and the
//! Detached -> Persisted -> Deleted state machine on top of [`execute`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};

use crate::error::{PersonioError, Result};
use crate::models::record::Payload;
use crate::models::resource::Resource;

/// Lifecycle verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Create => f.write_str("create"),
            Verb::Update => f.write_str("update"),
            Verb::Delete => f.write_str("delete"),
        }
    }
}

/// Verbs a resource type supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    /// Every verb enabled.
    pub const ALL: Capabilities = Capabilities {
        create: true,
        update: true,
        delete: true,
    };

    /// Every verb disabled.
    pub const NONE: Capabilities = Capabilities {
        create: false,
        update: false,
        delete: false,
    };

    /// Copy with `verb` disabled.
    pub const fn without(self, verb: Verb) -> Capabilities {
        match verb {
            Verb::Create => Capabilities {
                create: false,
                ..self
            },
            Verb::Update => Capabilities {
                update: false,
                ..self
            },
            Verb::Delete => Capabilities {
                delete: false,
                ..self
            },
        }
    }

    /// True if `verb` is enabled.
    pub const fn allows(self, verb: Verb) -> bool {
        match verb {
            Verb::Create => self.create,
            Verb::Update => self.update,
            Verb::Delete => self.delete,
        }
    }
}

/// Authentication surface of the transport collaborator.
pub trait Transport {
    /// True if the transport holds a usable token.
    fn authenticated(&self) -> bool;

    /// Obtain a token; calling it again when authenticated is harmless.
    fn authenticate(&self) -> Result<()>;
}

/// A resource type with class-level capability flags.
pub trait Writable: Resource {
    const CAPABILITIES: Capabilities = Capabilities::ALL;
}

/// Type-specific network operations behind the lifecycle verbs.
///
/// The defaults fail with [`PersonioError::UnsupportedOperation`] so a type
/// that enables a verb without implementing it fails loudly.
pub trait LifecycleHooks<C: Transport + ?Sized>: Writable {
    fn try_create(&mut self, client: &C) -> Result<()> {
        let _ = client;
        Err(unsupported(Verb::Create, Self::KIND))
    }

    fn try_update(&mut self, client: &C) -> Result<()> {
        let _ = client;
        Err(unsupported(Verb::Update, Self::KIND))
    }

    fn try_delete(&mut self, client: &C) -> Result<()> {
        let _ = client;
        Err(unsupported(Verb::Delete, Self::KIND))
    }
}

fn unsupported(verb: Verb, kind: &'static str) -> PersonioError {
    PersonioError::UnsupportedOperation { verb, kind }
}

fn ensure_allowed<T: Writable>(verb: Verb) -> Result<()> {
    if T::CAPABILITIES.allows(verb) {
        Ok(())
    } else {
        Err(unsupported(verb, T::KIND))
    }
}

/// Run `verb` on `resource` through `client`.
///
/// Fails with `UnsupportedOperation` before touching the client when the type
/// disables the verb, and with `NoClientConfigured` when `client` is `None`.
pub fn execute<T, C>(verb: Verb, resource: &mut T, client: Option<&C>) -> Result<()>
where
    T: LifecycleHooks<C>,
    C: Transport + ?Sized,
{
    ensure_allowed::<T>(verb)?;
    let client = client.ok_or(PersonioError::NoClientConfigured)?;
    if !client.authenticated() {
        client.authenticate()?;
    }

    match verb {
        Verb::Create => resource.try_create(client),
        Verb::Update => resource.try_update(client),
        Verb::Delete => resource.try_delete(client),
    }
}

/// Where a writable resource stands relative to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Built locally, not yet created.
    Detached,
    /// Known to the API.
    Persisted,
    /// Deleted through the API; no further verbs are allowed.
    Deleted,
}

impl LifecycleState {
    fn check(self, verb: Verb) -> Result<()> {
        let allowed = matches!(
            (self, verb),
            (LifecycleState::Detached, Verb::Create)
                | (LifecycleState::Persisted, Verb::Update)
                | (LifecycleState::Persisted, Verb::Delete)
        );
        if allowed {
            Ok(())
        } else {
            Err(PersonioError::InvalidState { verb, state: self })
        }
    }

    fn after(verb: Verb) -> LifecycleState {
        match verb {
            Verb::Create | Verb::Update => LifecycleState::Persisted,
            Verb::Delete => LifecycleState::Deleted,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Detached => f.write_str("detached"),
            LifecycleState::Persisted => f.write_str("persisted"),
            LifecycleState::Deleted => f.write_str("deleted"),
        }
    }
}

/// A writable resource with an optional stored client and a lifecycle state.
///
/// The client is held weakly and is not part of equality, ordering or hashing;
/// those compare the wrapped resource only.
pub struct WritableResource<T, C: ?Sized> {
    resource: T,
    client: Option<Weak<C>>,
    state: LifecycleState,
}

impl<T, C> WritableResource<T, C>
where
    T: LifecycleHooks<C>,
    C: Transport + ?Sized,
{
    /// Wrap a locally built resource.
    pub fn new(resource: T) -> Self {
        WritableResource {
            resource,
            client: None,
            state: LifecycleState::Detached,
        }
    }

    /// Wrap a resource that already exists in the API.
    pub fn persisted(resource: T) -> Self {
        WritableResource {
            resource,
            client: None,
            state: LifecycleState::Persisted,
        }
    }

    /// Decode a payload received from the API.
    pub fn from_payload(payload: &Payload, client: Option<&Arc<C>>) -> Result<Self> {
        let mut wrapped = Self::persisted(T::from_payload(payload)?);
        wrapped.client = client.map(Arc::downgrade);
        Ok(wrapped)
    }

    /// Store a weak reference to `client` for later verbs.
    pub fn with_client(mut self, client: &Arc<C>) -> Self {
        self.set_client(client);
        self
    }

    /// Replace the stored client.
    pub fn set_client(&mut self, client: &Arc<C>) {
        self.client = Some(Arc::downgrade(client));
    }

    /// Where the resource stands in its lifecycle.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Borrow the wrapped resource.
    pub fn resource(&self) -> &T {
        &self.resource
    }

    /// Unwrap, dropping the client reference.
    pub fn into_inner(self) -> T {
        self.resource
    }

    /// Create the resource; `client` overrides the stored one.
    pub fn create(&mut self, client: Option<&C>) -> Result<()> {
        self.run(Verb::Create, client)
    }

    /// Push local changes; `client` overrides the stored one.
    pub fn update(&mut self, client: Option<&C>) -> Result<()> {
        self.run(Verb::Update, client)
    }

    /// Delete the resource; the value stays usable but accepts no more verbs.
    pub fn delete(&mut self, client: Option<&C>) -> Result<()> {
        self.run(Verb::Delete, client)
    }

    fn run(&mut self, verb: Verb, client: Option<&C>) -> Result<()> {
        ensure_allowed::<T>(verb)?;
        self.state.check(verb)?;

        let stored = self.client.as_ref().and_then(Weak::upgrade);
        let client = client.or(stored.as_deref());
        execute(verb, &mut self.resource, client)?;

        self.state = LifecycleState::after(verb);
        Ok(())
    }
}

impl<T, C: ?Sized> Deref for WritableResource<T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T, C: ?Sized> DerefMut for WritableResource<T, C> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.resource
    }
}

impl<T: Clone, C: ?Sized> Clone for WritableResource<T, C> {
    fn clone(&self) -> Self {
        WritableResource {
            resource: self.resource.clone(),
            client: self.client.clone(),
            state: self.state,
        }
    }
}

impl<T: fmt::Debug, C: ?Sized> fmt::Debug for WritableResource<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritableResource")
            .field("resource", &self.resource)
            .field("state", &self.state)
            .field("has_client", &self.client.is_some())
            .finish()
    }
}

impl<T: PartialEq, C: ?Sized> PartialEq for WritableResource<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource
    }
}

impl<T: Eq, C: ?Sized> Eq for WritableResource<T, C> {}

impl<T: Ord, C: ?Sized> PartialOrd for WritableResource<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord, C: ?Sized> Ord for WritableResource<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resource.cmp(&other.resource)
    }
}

impl<T: Hash, C: ?Sized> Hash for WritableResource<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource.hash(state);
    }
}
