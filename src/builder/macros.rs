//! Macros for declarative hierarchy construction.

/// Declare a hierarchy as a comma-separated tree of `state` and `region`
/// items, yielding a [`MachineBuilder`](crate::builder::MachineBuilder)
/// ready for further configuration or an immediate `build()`.
///
/// States declared through the macro carry no behaviors; use the builder
/// API directly when a state needs callbacks.
///
/// # Example
///
/// ```rust
/// use canopy::hierarchy;
///
/// let machine = hierarchy! {
///     state Idle,
///     region Patrol {
///         state Walk,
///         state Turn,
///     },
/// }
/// .build()
/// .unwrap();
///
/// assert!(machine.is_active("Idle"));
/// ```
#[macro_export]
macro_rules! hierarchy {
    ( $($items:tt)* ) => {
        $crate::__hierarchy_items!($crate::builder::MachineBuilder::new(); $($items)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __hierarchy_items {
    ($builder:expr; ) => { $builder };
    ($builder:expr; state $name:ident $(, $($rest:tt)*)? ) => {
        $crate::__hierarchy_items!($builder.state(stringify!($name)); $($($rest)*)?)
    };
    ($builder:expr; region $name:ident { $($inner:tt)* } $(, $($rest:tt)*)? ) => {
        $crate::__hierarchy_items!(
            $builder.region(stringify!($name), |r| {
                $crate::__region_items!(r; $($inner)*);
            });
            $($($rest)*)?
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __region_items {
    ($region:ident; ) => {};
    ($region:ident; state $name:ident $(, $($rest:tt)*)? ) => {
        $region.state(stringify!($name));
        $crate::__region_items!($region; $($($rest)*)?);
    };
    ($region:ident; region $name:ident { $($inner:tt)* } $(, $($rest:tt)*)? ) => {
        $region.region(stringify!($name), |r| {
            $crate::__region_items!(r; $($inner)*);
        });
        $crate::__region_items!($region; $($($rest)*)?);
    };
}
