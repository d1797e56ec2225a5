//! Background decoration layers.
//!
//! Purely cosmetic full-viewport layers behind the presentation. The module
//! owns every layer it inserts and removes exactly those on unmount. Mounting
//! an already-mounted decoration, or mounting over layers some other owner
//! already inserted, never duplicates a layer.

/// Description of one non-interactive layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpec {
    /// Stable identifier; the host uses it to detect duplicates.
    pub id: String,
    pub class_name: String,
    pub z_index: i32,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, class_name: impl Into<String>, z_index: i32) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            z_index,
        }
    }
}

/// Whatever actually renders the layers (a DOM, a terminal, a test double).
pub trait DecorationHost {
    type Handle;

    fn contains_layer(&self, id: &str) -> bool;

    fn insert_layer(&mut self, spec: &LayerSpec) -> Self::Handle;

    fn remove_layer(&mut self, handle: Self::Handle);
}

/// A set of layers that can be mounted onto and unmounted from a host.
#[derive(Debug)]
pub struct BackgroundDecoration<H> {
    layers: Vec<LayerSpec>,
    mounted: Vec<H>,
}

impl<H> BackgroundDecoration<H> {
    pub fn new(layers: Vec<LayerSpec>) -> Self {
        Self {
            layers,
            mounted: Vec::new(),
        }
    }

    /// The stock Sizzle backdrop: a warm gradient under a grain texture.
    pub fn sizzle_default() -> Self {
        Self::new(vec![
            LayerSpec::new("sizzle-bg-gradient", "bg-gradient", -20),
            LayerSpec::new("sizzle-bg-grain", "bg-grain", -10),
        ])
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn is_mounted(&self) -> bool {
        !self.mounted.is_empty()
    }

    /// Insert every layer the host does not already have.
    ///
    /// Returns how many layers were inserted.
    pub fn mount<T>(&mut self, host: &mut T) -> usize
    where
        T: DecorationHost<Handle = H>,
    {
        let mut inserted = 0;
        for spec in &self.layers {
            if host.contains_layer(&spec.id) {
                continue;
            }
            self.mounted.push(host.insert_layer(spec));
            inserted += 1;
        }
        tracing::debug!(inserted, "background decoration mounted");
        inserted
    }

    /// Remove every layer this decoration inserted.
    pub fn unmount<T>(&mut self, host: &mut T) -> usize
    where
        T: DecorationHost<Handle = H>,
    {
        let removed = self.mounted.len();
        for handle in self.mounted.drain(..) {
            host.remove_layer(handle);
        }
        tracing::debug!(removed, "background decoration unmounted");
        removed
    }

    /// Mount for the lifetime of the returned guard.
    pub fn scoped<T>(self, host: &mut T) -> MountGuard<'_, T>
    where
        T: DecorationHost<Handle = H>,
    {
        let mut decoration = self;
        decoration.mount(&mut *host);
        MountGuard { host, decoration }
    }
}

/// RAII guard that unmounts its decoration when dropped.
pub struct MountGuard<'a, T: DecorationHost> {
    host: &'a mut T,
    decoration: BackgroundDecoration<T::Handle>,
}

impl<T: DecorationHost> MountGuard<'_, T> {
    pub fn host(&self) -> &T {
        self.host
    }
}

impl<T: DecorationHost> Drop for MountGuard<'_, T> {
    fn drop(&mut self) {
        self.decoration.unmount(&mut *self.host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Host that records layers in insertion order.
    #[derive(Default)]
    struct RecordingHost {
        next_handle: usize,
        layers: Vec<(usize, String)>,
    }

    impl DecorationHost for RecordingHost {
        type Handle = usize;

        fn contains_layer(&self, id: &str) -> bool {
            self.layers.iter().any(|(_, layer)| layer == id)
        }

        fn insert_layer(&mut self, spec: &LayerSpec) -> usize {
            self.next_handle += 1;
            self.layers.push((self.next_handle, spec.id.clone()));
            self.next_handle
        }

        fn remove_layer(&mut self, handle: usize) {
            self.layers.retain(|(h, _)| *h != handle);
        }
    }

    #[test]
    fn test_mount_twice_does_not_duplicate() {
        let mut host = RecordingHost::default();
        let mut decoration = BackgroundDecoration::sizzle_default();

        assert_eq!(decoration.mount(&mut host), 2);
        assert_eq!(decoration.mount(&mut host), 0);
        assert_eq!(host.layers.len(), 2);

        assert_eq!(decoration.unmount(&mut host), 2);
        assert!(host.layers.is_empty());
        assert!(!decoration.is_mounted());
    }

    #[test]
    fn test_unmount_only_removes_own_layers() {
        let mut host = RecordingHost::default();
        host.insert_layer(&LayerSpec::new("sizzle-bg-grain", "bg-grain", -10));
        host.insert_layer(&LayerSpec::new("app-root", "root", 0));

        let mut decoration = BackgroundDecoration::sizzle_default();
        assert_eq!(decoration.mount(&mut host), 1);
        decoration.unmount(&mut host);

        let ids: Vec<_> = host.layers.iter().map(|(_, id)| id.as_str()).collect();
        assert_eq!(ids, vec!["sizzle-bg-grain", "app-root"]);
    }

    #[test]
    fn test_remount_after_unmount() {
        let mut host = RecordingHost::default();
        let mut decoration = BackgroundDecoration::sizzle_default();
        decoration.mount(&mut host);
        decoration.unmount(&mut host);
        assert_eq!(decoration.mount(&mut host), 2);
        assert_eq!(host.layers.len(), 2);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let mut host = RecordingHost::default();
        {
            let guard = BackgroundDecoration::sizzle_default().scoped(&mut host);
            assert_eq!(guard.host().layers.len(), 2);
        }
        assert!(host.layers.is_empty());
    }
}
