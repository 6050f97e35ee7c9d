//! Tracked instances under a lifecycle policy
//!
//! An [`InstanceRegistry`] owns the instances of one kind of resource and a
//! pointer to the "current" one. The policy is applied when an instance is
//! registered, deciding whether it is admitted and which instance is current.

use tracing::debug;

/// How a registry treats additional instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePolicy {
    /// At most one instance; newcomers are rejected while one exists
    #[default]
    KeepFirst,
    /// At most one instance; a newcomer evicts the current one
    KeepLast,
    /// Keep every instance
    ///
    /// The newest becomes current, unless `track_first` is set and a current
    /// instance already exists.
    AllowAll { track_first: bool },
}

/// Outcome of [`InstanceRegistry::register`]
#[derive(Debug, PartialEq, Eq)]
pub enum Admission<T> {
    /// Stored and now current
    Current,
    /// Stored, current unchanged
    Retained,
    /// Refused; the newcomer is handed back
    Rejected(T),
    /// Stored as current; the evicted instance is handed back
    Replaced(T),
}

impl<T> Admission<T> {
    /// Whether the registered instance was stored
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Rejected(_))
    }
}

/// Instances of one resource plus the current pointer
#[derive(Debug)]
pub struct InstanceRegistry<T> {
    policy: LifecyclePolicy,
    instances: Vec<T>,
    current: Option<usize>,
}

impl<T> InstanceRegistry<T> {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self {
            policy,
            instances: Vec::new(),
            current: None,
        }
    }

    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    /// Register a new instance, applying the policy
    pub fn register(&mut self, instance: T) -> Admission<T> {
        match (self.policy, self.current) {
            (_, None) => {
                self.instances.push(instance);
                self.current = Some(self.instances.len() - 1);
                Admission::Current
            }
            (LifecyclePolicy::KeepFirst, Some(_)) => {
                debug!("Instance rejected, one already exists");
                Admission::Rejected(instance)
            }
            (LifecyclePolicy::KeepLast, Some(idx)) => {
                debug!("Instance replaces the current one");
                let old = std::mem::replace(&mut self.instances[idx], instance);
                Admission::Replaced(old)
            }
            (LifecyclePolicy::AllowAll { track_first }, Some(_)) => {
                self.instances.push(instance);
                if track_first {
                    Admission::Retained
                } else {
                    self.current = Some(self.instances.len() - 1);
                    Admission::Current
                }
            }
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.current.map(|idx| &self.instances[idx])
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current.map(|idx| &mut self.instances[idx])
    }

    /// Drop the current instance; the next registration becomes current
    pub fn remove_current(&mut self) -> Option<T> {
        let idx = self.current.take()?;
        Some(self.instances.remove(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<T> Default for InstanceRegistry<T> {
    fn default() -> Self {
        Self::new(LifecyclePolicy::default())
    }
}
