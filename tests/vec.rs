#![cfg(feature = "alloc")]

use core::marker::PhantomData as Cfg;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rstest::rstest;

use grow_vec::{
    alloc::Global,
    capacity::GrowExact,
    vec::config::{Custom, VecConfig},
    OutOfRange, Vec as GrowVec,
};

const SLICE: &[usize] = &[1, 2, 3, 4, 5];

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Zst;

#[test]
fn vec_new_global() {
    let v = GrowVec::<usize>::new();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 0);
}

#[test]
fn vec_check_capacity_growth() {
    let mut res = [0usize; 10];
    let mut vec = GrowVec::<usize>::new();
    for cap in res.iter_mut() {
        vec.push(1);
        *cap = vec.capacity();
    }
    assert_eq!(res, [1, 2, 4, 4, 8, 8, 8, 8, 16, 16]);
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(3, 4)]
#[case(4, 4)]
#[case(5, 8)]
#[case(1000, 1024)]
fn vec_sized_capacity(#[case] len: usize, #[case] capacity: usize) {
    let v = GrowVec::<u32>::from_default(len);
    assert_eq!(v.len(), len);
    assert_eq!(v.capacity(), capacity);
    let v = GrowVec::<u32>::from_elem(&9, len);
    assert_eq!(v.capacity(), capacity);
    assert!(v.as_slice().iter().all(|x| *x == 9));
    let v = GrowVec::<u32>::with_capacity(len);
    assert!(v.is_empty());
    assert_eq!(v.capacity(), capacity);
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[case::exact(Cfg::<Custom<Global, GrowExact>>)]
#[cfg_attr(feature = "zeroize", case::zeroizing(Cfg::<grow_vec::alloc::ZeroizingAlloc<Global>>))]
fn vec_push_order<C: VecConfig>(#[case] _config: Cfg<C>) {
    let mut v = GrowVec::<usize, C>::new();
    for &item in SLICE {
        v.push(item);
    }
    assert_eq!(v.len(), SLICE.len());
    assert!(v.capacity() >= SLICE.len());
    assert_eq!(v.as_slice(), SLICE);
    for (idx, &item) in SLICE.iter().enumerate() {
        assert_eq!(v[idx], item);
        assert_eq!(v.at(idx), Ok(&item));
    }
}

#[rstest]
#[case::global(Cfg::<Global>)]
#[case::exact(Cfg::<Custom<Global, GrowExact>>)]
fn vec_zst<C: VecConfig>(#[case] _config: Cfg<C>) {
    let mut v = GrowVec::<Zst, C>::from_default(10);
    assert_eq!(v.len(), 10);
    v.push(Zst);
    v.resize(40, Zst);
    assert_eq!(v.len(), 40);
    assert_eq!(v.pop(), Some(Zst));
    v.clear();
    assert!(v.is_empty());
}

#[test]
fn vec_copy_is_independent() {
    let mut a = GrowVec::<String>::from_slice(&["a".into(), "b".into(), "c".into()]);
    let b = a.clone();
    a[0].push('!');
    a.push("d".into());
    assert_eq!(b, ["a", "b", "c"]);
    assert_eq!(b.capacity(), 4);
    assert_eq!(a, ["a!", "b", "c", "d"]);
}

#[test]
fn vec_clone_empty() {
    let a = GrowVec::<u32>::with_capacity(100);
    let b = a.clone();
    assert!(b.is_empty());
    assert_eq!(b.capacity(), 0);
}

#[test]
fn vec_take_releases_source() {
    let mut a = GrowVec::<u32>::from_slice(&[1, 2, 3]);
    let ptr = a.as_ptr();
    let b = a.take();
    assert_eq!(b, [1, 2, 3]);
    assert_eq!(b.as_ptr(), ptr);
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 0);
}

#[test]
fn vec_move_assign() {
    let mut a = GrowVec::<String>::from_elem(&"x".into(), 3);
    let mut b = GrowVec::<String>::from_slice(&["y".into(), "z".into()]);
    let ptr = b.as_ptr();
    a.move_assign(&mut b);
    assert_eq!(a, ["y", "z"]);
    assert_eq!(a.as_ptr(), ptr);
    assert!(b.is_empty());
}

#[test]
fn vec_clone_from_reuses_empty_buffer() {
    let mut a = GrowVec::<u32>::with_capacity(16);
    let ptr = a.as_ptr();
    let b = GrowVec::<u32>::from_slice(&[1, 2, 3, 4, 5]);
    a.clone_from(&b);
    assert_eq!(a, b);
    assert_eq!(a.as_ptr(), ptr);
    assert_eq!(a.capacity(), 16);
}

#[test]
fn vec_clone_from_replaces_nonempty() {
    let mut a = GrowVec::<u32>::from_elem(&0, 6);
    let b = GrowVec::<u32>::from_slice(&[7, 8, 9]);
    a.clone_from(&b);
    assert_eq!(a, [7, 8, 9]);
    assert_eq!(a.capacity(), 4);

    let empty = GrowVec::<u32>::new();
    let mut c = GrowVec::<u32>::from_elem(&1, 5);
    c.clone_from(&empty);
    assert!(c.is_empty());
    assert_eq!(c.capacity(), 8);
}

#[rstest]
#[case::shrink(6, 3)]
#[case::grow(2, 7)]
#[case::equal(5, 5)]
#[case::from_empty(0, 4)]
fn vec_assign_from_in_place(#[case] from_len: usize, #[case] to_len: usize) {
    let mut a = GrowVec::<u64>::with_capacity(8);
    a.resize(from_len, 1);
    let ptr = a.as_ptr();
    let src: Vec<u64> = (0..to_len as u64).collect();
    let b = GrowVec::<u64>::from_slice(&src);
    a.assign_from(&b);
    assert_eq!(a, b);
    assert_eq!(a.capacity(), 8);
    assert_eq!(a.as_ptr(), ptr);
}

#[test]
fn vec_assign_from_grows() {
    let mut a = GrowVec::<u64>::from_slice(&[1, 2]);
    let b = GrowVec::<u64>::from_slice(&[3, 4, 5, 6, 7]);
    a.assign_from(&b);
    assert_eq!(a, [3, 4, 5, 6, 7]);
    assert_eq!(a.capacity(), 8);
}

#[test]
fn vec_at_out_of_range() {
    let mut v = GrowVec::<u8>::from([1, 2, 3]);
    assert_eq!(v.at(3), Err(OutOfRange { index: 3, len: 3 }));
    assert_eq!(v.at_mut(10).unwrap_err().index, 10);
    *v.at_mut(2).unwrap() = 5;
    assert_eq!(v, [1, 2, 5]);
    assert_eq!(unsafe { *v.get_unchecked(1) }, 2);
}

#[test]
#[should_panic(expected = "out of range")]
fn vec_index_panics() {
    let v = GrowVec::<u8>::from([1, 2, 3]);
    let _ = v[3];
}

#[test]
fn vec_resize_down_then_up() {
    let mut v = GrowVec::<u32>::from_slice(&[1, 2, 3, 4, 5, 6]);
    v.resize(2, 0);
    assert_eq!(v, [1, 2]);
    assert_eq!(v.capacity(), 8);
    v.resize(5, 9);
    assert_eq!(v, [1, 2, 9, 9, 9]);
    assert_eq!(v.capacity(), 8);
    v.resize(9, 4);
    assert_eq!(v, [1, 2, 9, 9, 9, 4, 4, 4, 4]);
    assert_eq!(v.capacity(), 16);
    v.resize_default(10);
    assert_eq!(v[9], 0);
}

#[test]
fn vec_truncate_keeps_capacity() {
    let mut v = GrowVec::<String>::from_slice(&["a".into(), "b".into(), "c".into()]);
    v.truncate(5);
    assert_eq!(v.len(), 3);
    v.truncate(1);
    assert_eq!(v, ["a"]);
    assert_eq!(v.capacity(), 4);
}

#[test]
fn vec_reserve_address_stability() {
    let mut v = GrowVec::<usize>::new();
    v.reserve(100);
    assert_eq!(v.capacity(), 128);
    let ptr = v.as_ptr();
    for i in 0..128 {
        v.push(i);
    }
    assert_eq!(v.as_ptr(), ptr);
    v.reserve(50);
    assert_eq!(v.capacity(), 128);
    v.push(128);
    assert_eq!(v.capacity(), 256);
    assert_ne!(v.as_ptr(), ptr);
    assert!((0..129).eq(v.as_slice().iter().copied()));
}

#[test]
fn vec_push_clone() {
    let mut v = GrowVec::<String>::new();
    let item = String::from("item");
    v.push_clone(&item);
    v.push_clone(&item);
    assert_eq!(v, ["item", "item"]);
    assert_eq!(item, "item");
}

#[test]
fn vec_macro() {
    let v: GrowVec<u32> = grow_vec::vec![];
    assert_eq!(v.capacity(), 0);
    let v: GrowVec<u32> = grow_vec::vec![3; 5];
    assert_eq!(v, [3, 3, 3, 3, 3]);
    assert_eq!(v.capacity(), 8);
    let v: GrowVec<String> = grow_vec::vec!["a".to_string(), "b".to_string(),];
    assert_eq!(v, ["a", "b"]);
}

#[test]
fn vec_debug_eq() {
    let v = GrowVec::<u32>::from([1, 2]);
    assert_eq!(format!("{:?}", v), "[1, 2]");
    assert_eq!(v, &[1, 2]);
    assert_eq!(v, &[1u32, 2][..]);
    assert_eq!(v, GrowVec::<u32, Custom<Global, GrowExact>>::from([1, 2]));
    assert_ne!(v, [1, 2, 3]);
}

#[test]
fn vec_send_sync() {
    fn check<T: Send + Sync>(_: &T) {}
    let v = GrowVec::<u32>::from([1]);
    check(&v);
    let handle = std::thread::spawn(move || v.len());
    assert_eq!(handle.join().unwrap(), 1);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn vec_model(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model: Vec<u32> = Vec::new();
    let mut v = GrowVec::<u32>::new();
    for _ in 0..2000 {
        match rng.gen_range(0..8) {
            0 | 1 | 2 => {
                let x = rng.gen();
                model.push(x);
                v.push(x);
            }
            3 => {
                assert_eq!(v.pop(), model.pop());
            }
            4 => {
                let n = rng.gen_range(0..64);
                let x = rng.gen();
                model.resize(n, x);
                v.resize(n, x);
            }
            5 => {
                let n = rng.gen_range(0..64);
                model.truncate(n);
                v.truncate(n);
            }
            6 => {
                let n = rng.gen_range(0..128);
                v.reserve(n);
                assert!(v.capacity() >= n);
            }
            _ => {
                let other = GrowVec::<u32>::from_slice(&model);
                v.assign_from(&other);
            }
        }
        assert_eq!(v.as_slice(), model.as_slice());
        let cap = v.capacity();
        assert!(cap == 0 || cap.is_power_of_two());
        assert!(cap >= v.len());
    }
}
