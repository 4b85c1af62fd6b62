//! 倉庫拜訪順序列舉

/// `n!` 的值，溢位時回傳 `None`
pub fn permutation_count(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |acc, k| acc.checked_mul(k))
}

/// 依字典序列舉 `0..n` 的所有排列
///
/// 順序固定：第一個為 `[0, 1, .., n-1]`，最後一個為完全反轉。
pub fn lexicographic_permutations(n: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..n).collect();
    let mut result = Vec::with_capacity(permutation_count(n).unwrap_or(0));
    result.push(current.clone());

    while next_permutation(&mut current) {
        result.push(current.clone());
    }

    result
}

/// 原地推進到下一個字典序排列；已是最後一個時回傳 false
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }

    let mut i = items.len() - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let mut j = items.len() - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}
