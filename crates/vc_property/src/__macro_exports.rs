//! Items used by code generated from `vc_property_derive`.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::bean::Bean;
    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

    /// A registration function submitted by `#[bean(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    /// Gives every [`GetTypeMeta`] type a plain registration function.
    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Registered through `inventory` to detect whether collection works on
    /// the current platform.
    pub struct __AvailFlag;

    impl Bean for __AvailFlag {}

    impl GetTypeMeta for __AvailFlag {
        #[inline]
        fn get_type_meta() -> TypeMeta {
            TypeMeta::of::<Self>()
        }
    }

    inventory::submit! {
        __AutoRegisterFunc(<__AvailFlag as __RegisterType>::__register)
    }

    /// Runs every submitted registration function.
    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
